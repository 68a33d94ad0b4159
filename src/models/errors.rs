use std::io;
use std::path::{Path, PathBuf};

use csv::{ErrorKind, StringRecord};
use thiserror::Error;

use crate::models::SettlementRecord;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Settlement data source [{}] could not be read: {source}", .path.display())]
    MissingDataSource {
        path: PathBuf,
        source: io::Error
    },
    #[error("Malformed settlement record in [{}] at line [{line}], field [{field}]: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        field: String,
        reason: String
    },
    #[error("Invalid configuration for [{field}]: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String
    },
    #[error("Numeric overflow while computing [{quantity}] for [{subject}]")]
    Overflow {
        quantity: &'static str,
        subject: String
    }
}

impl SettlementError {
    pub fn missing_data_source(path: &Path, source: io::Error) -> Self {
        Self::MissingDataSource { path: path.to_path_buf(), source }
    }

    /// Builds a `MalformedRecord` from a csv error, resolving the offending column against the header row.
    ///
    /// Value errors raised while parsing a cell carry no column index, so the raw `row`
    /// is checked cell by cell when it is available.
    pub fn malformed_record(path: &Path, error: &csv::Error, headers: &StringRecord, row: Option<&StringRecord>) -> Self {
        let line = error.position().map(|position| position.line()).unwrap_or_default();

        let field = match error.kind() {
            ErrorKind::Deserialize { err, .. } => err.field()
                .and_then(|index| headers.get(index as usize))
                .map(str::to_string)
                .or_else(|| row.and_then(|row| SettlementRecord::offending_column(headers, row))),
            _ => None
        };

        Self::MalformedRecord {
            path: path.to_path_buf(),
            line,
            field: field.unwrap_or_else(|| "-".to_string()),
            reason: error.to_string()
        }
    }

    pub fn invalid_configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { field, reason: reason.into() }
    }

    pub fn overflow(quantity: &'static str, subject: impl ToString) -> Self {
        Self::Overflow { quantity, subject: subject.to_string() }
    }
}
