//! CLI module for tagstore
//!
//! Provides command-line access to one configured store:
//! - append: Add records read from stdin
//! - list: Print every record
//! - get: Print the record under a key
//! - update: Replace records from stdin
//! - remove: Delete the records under a key

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{append, get, list, remove, run, run_command, update, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json, record_from_json, record_to_json, write_error, write_response};
