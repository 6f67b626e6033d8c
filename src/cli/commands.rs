//! CLI command implementations

use std::path::Path;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::executor::{QueryExecutor, QueryResult};
use crate::observability::Severity;
use crate::query::{ParseDiagnostic, ParsedQuery, QueryParser};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_records, write_error, write_response};

/// Output of the `parse` command
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub query: ParsedQuery,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parse arguments, run the command, report errors as JSON
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(err) => {
            // Best effort: the error is returned either way
            let _ = write_error(&err);
            Err(err)
        }
    }
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Query {
            records,
            query,
            config,
            strict,
            log_level,
        } => {
            let config = load_config(config.as_deref(), strict, log_level)?;
            let result = query_file(&records, &query, &config)?;
            write_response(&result)
        }
        Command::Parse {
            query,
            config,
            strict,
            log_level,
        } => {
            let config = load_config(config.as_deref(), strict, log_level)?;
            let report = parse_report(&query, &config)?;
            write_response(&report)
        }
    }
}

/// Load the config file if given. `--strict` forces strict mode on and
/// `--log-level` wins over the file. Without either source the CLI logs
/// absorbed input problems at WARN.
pub fn load_config(
    path: Option<&Path>,
    strict: bool,
    log_level: Option<Severity>,
) -> CliResult<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default().with_log_level(Severity::Warn),
    };
    if let Some(level) = log_level {
        config = config.with_log_level(level);
    }
    Ok(if strict { config.with_strict(true) } else { config })
}

/// Run a query string over a records file
pub fn query_file(records: &Path, query: &str, config: &EngineConfig) -> CliResult<QueryResult> {
    let parser = QueryParser::new(config.clone());
    let parsed = parser.parse_checked(query)?;
    let records = read_records(records, config.detect_dates, config.logger())?;
    Ok(QueryExecutor::new(config).execute(&records, &parsed))
}

/// Parse a query string and collect diagnostics.
/// In strict mode a diagnostic is an error instead.
pub fn parse_report(query: &str, config: &EngineConfig) -> CliResult<ParseReport> {
    let parser = QueryParser::new(config.clone());
    if config.strict {
        let parsed = parser.parse_strict(query).map_err(CliError::from)?;
        return Ok(ParseReport {
            query: parsed,
            diagnostics: Vec::new(),
        });
    }
    let (parsed, diagnostics) = parser.parse_with_diagnostics(query);
    Ok(ParseReport {
        query: parsed,
        diagnostics,
    })
}
