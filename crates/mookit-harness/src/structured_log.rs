//! Structured logging for verification workflows.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL record for one verification event.
//! - [`LogEmitter`]: writes JSONL lines to a file or stdout.
//! - [`validate_log_line`]: validates a single JSONL line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// One JSONL log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Fixture family, e.g. "hv".
    pub family: String,
    /// Case name within the family.
    pub case: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LogEntry {
    pub fn pass(family: &str, case: &str) -> Self {
        Self {
            level: LogLevel::Info,
            family: family.to_string(),
            case: case.to_string(),
            outcome: Outcome::Pass,
            indicator: None,
            expected: None,
            actual: None,
            message: None,
        }
    }

    pub fn fail(family: &str, case: &str, indicator: &str, expected: f64, actual: f64) -> Self {
        Self {
            level: LogLevel::Error,
            family: family.to_string(),
            case: case.to_string(),
            outcome: Outcome::Fail,
            indicator: Some(indicator.to_string()),
            expected: Some(expected),
            actual: Some(actual),
            message: None,
        }
    }
}

/// Writes JSONL records to a file or stdout.
pub struct LogEmitter {
    sink: Box<dyn Write>,
}

impl LogEmitter {
    pub fn to_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            sink: Box::new(BufWriter::new(File::create(path)?)),
        })
    }

    pub fn to_stdout() -> Self {
        Self {
            sink: Box::new(std::io::stdout()),
        }
    }

    pub fn emit(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry).expect("log entries serialise");
        writeln!(self.sink, "{line}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

/// Validate one JSONL line against the schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, serde_json::Error> {
    serde_json::from_str(line)
}
