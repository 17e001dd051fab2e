//! tagstore CLI entry point
//!
//! Parses arguments, dispatches and prints through `cli::run`. On failure
//! the error is also printed to stderr and the process exits with 1.

use tagstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
