//! JSON I/O handling for the CLI
//!
//! - Input: records file holding one JSON array of objects
//! - Output: single JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::executor::{records_from_json, Record};
use crate::observability::Logger;

use super::errors::{CliError, CliResult};

/// Read a JSON array of records from a file
pub fn read_records(path: &Path, detect_dates: bool, logger: Logger) -> CliResult<Vec<Record>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("{}: {}", path.display(), e)))?;
    let value: Value = serde_json::from_str(&contents)?;
    records_from_json(&value, detect_dates, logger).ok_or_else(|| {
        CliError::invalid_records(format!("{}: expected a JSON array", path.display()))
    })
}

/// Write a value as one JSON line to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, data)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error object to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_response(&serde_json::json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FieldValue;

    #[test]
    fn test_read_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "at": "2024-02-01"}}, {{"id": 2}}]"#).unwrap();

        let records = read_records(file.path(), true, Logger::disabled()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0].get("at"), Some(FieldValue::Date(_))));
    }

    #[test]
    fn test_read_records_rejects_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 1}}"#).unwrap();

        let err = read_records(file.path(), true, Logger::disabled()).unwrap_err();
        assert_eq!(err.code_str(), "CLI_INVALID_RECORDS");
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("none.json"), false, Logger::disabled())
            .unwrap_err();
        assert_eq!(err.code_str(), "CLI_IO_ERROR");
    }
}
