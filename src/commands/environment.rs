// ABOUTME: Environment command implementations.
// ABOUTME: Switches the current environment and sets its variables.

use kubeb::config::parse_assignments;
use kubeb::error::Result;
use kubeb::output::Output;

use super::orchestrator;

/// Make `name` the current environment.
pub fn env(name: String, output: Output) -> Result<()> {
    let created = orchestrator()?.use_environment(&name)?;
    if created {
        output.success(&format!("Created environment {name} and switched to it"));
    } else {
        output.success(&format!("Switched to environment {name}"));
    }
    Ok(())
}

/// Set variables of the current environment.
pub fn setenv(assignments: Vec<String>, output: Output) -> Result<()> {
    let overrides = parse_assignments(&assignments)?;
    let environment = orchestrator()?.set_variables(overrides)?;

    if !output.data(&environment) {
        for (key, value) in &environment.variables {
            output.line(&format!("{key}={value}"));
        }
    }
    Ok(())
}
