//! Seed a session's store from CSV or JSON files.

use std::path::Path;

use crate::core::{Transaction, TransactionError};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Parse(String),
    /// A row failed validation. `row` is 1-based and excludes the header.
    Transaction { row: usize, source: TransactionError },
    UnsupportedFormat(String),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "io error: {e}"),
            ImportError::Parse(e) => write!(f, "parse error: {e}"),
            ImportError::Transaction { row, source } => {
                write!(f, "invalid transaction in row {row}: {source}")
            }
            ImportError::UnsupportedFormat(ext) => {
                write!(f, "unsupported file format: {ext}")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            ImportError::Transaction { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e)
    }
}

pub trait StatementImporter {
    fn parse(path: &Path) -> Result<Vec<Transaction>, ImportError>;
}

pub mod csv;
pub mod json;

/// Picks an importer from the file extension (`csv` or `json`).
pub fn parse_file(path: &Path) -> Result<Vec<Transaction>, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let records = match ext.as_str() {
        "csv" => csv::parse(path)?,
        "json" => json::parse(path)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };
    tracing::info!(path = %path.display(), records = records.len(), "Imported transactions");
    Ok(records)
}
