// ABOUTME: Library root for kubeb - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod driver;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod output;
pub mod release_note;
pub mod template;
pub mod types;
