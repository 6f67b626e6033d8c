//! CLI module
//!
//! - query: run a query string over a JSON records file
//! - parse: show the structured form of a query string

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{load_config, parse_report, query_file, run, run_command, ParseReport};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_records, write_error, write_response};
