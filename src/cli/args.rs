//! CLI argument definitions using clap
//!
//! Commands:
//! - tagstore append [--config <path>]
//! - tagstore list [--config <path>]
//! - tagstore get --key <key> [--config <path>]
//! - tagstore update [--config <path>]
//! - tagstore remove --key <key> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tagstore - A line-oriented record store
#[derive(Parser, Debug)]
#[command(name = "tagstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./tagstore.json")]
    pub config: PathBuf,

    /// Log threshold: trace, info, warn, error, fatal or off
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append a JSON record, or an array of records, read from stdin
    Append,

    /// Print every record
    List,

    /// Print the record stored under a key
    Get {
        /// Key value, parsed as the key field's type
        #[arg(long)]
        key: String,
    },

    /// Replace the records sharing the key of the JSON record read from stdin
    Update,

    /// Remove the records stored under a key
    Remove {
        /// Key value, parsed as the key field's type
        #[arg(long)]
        key: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
