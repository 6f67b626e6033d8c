//! CLI argument definitions using clap
//!
//! Commands:
//! - odata-lite query --records <path> --query <qs>
//! - odata-lite parse --query <qs>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// odata-lite - OData-style filtering, sorting and paging over JSON records
#[derive(Parser, Debug)]
#[command(name = "odata-lite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query over a JSON array of records and print the result
    Query {
        /// Path to a JSON file holding an array of objects
        #[arg(long)]
        records: PathBuf,

        /// Decoded query string, e.g. "$filter=isActive eq true&$top=5"
        #[arg(long, default_value = "")]
        query: String,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reject malformed query input instead of dropping it
        #[arg(long)]
        strict: bool,

        /// Log level for stderr; overrides the config file (default: warn)
        #[arg(long)]
        log_level: Option<Severity>,
    },

    /// Parse a query string and print its structured form
    Parse {
        /// Decoded query string
        #[arg(long, default_value = "")]
        query: String,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reject malformed query input instead of dropping it
        #[arg(long)]
        strict: bool,

        /// Log level for stderr; overrides the config file (default: warn)
        #[arg(long)]
        log_level: Option<Severity>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
