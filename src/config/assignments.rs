// ABOUTME: Parsing of `key=value` assignments from the command line.
// ABOUTME: Used by `setenv` arguments and `deploy --set` option lists.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Parse a single `key=value` pair. The value may itself contain `=`.
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| Error::InvalidConfig(format!("expected key=value, got '{input}'")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidConfig(format!("empty key in '{input}'")));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse assignments given as separate arguments and/or comma-separated lists.
pub fn parse_assignments<S: AsRef<str>>(inputs: &[S]) -> Result<BTreeMap<String, String>> {
    inputs
        .iter()
        .flat_map(|input| input.as_ref().split(','))
        .filter(|item| !item.trim().is_empty())
        .map(parse_assignment)
        .collect()
}
