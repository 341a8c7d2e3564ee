//! Error types for transaction ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop ingestion before any record is produced.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}: save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse the CSV header.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Schema Errors ===
    /// Required columns are absent from the header.
    #[error("required columns missing from {path}: {}", columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// The same column appears more than once in the header.
    #[error("column '{column}' appears more than once in {path}")]
    DuplicateColumn { column: String, path: PathBuf },

    /// A header that cannot be attributed to one entity.
    #[error("ambiguous column '{column}' in {path}: use {hint}")]
    AmbiguousColumn {
        column: String,
        hint: &'static str,
        path: PathBuf,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/sales.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/sales.csv");
    }

    #[test]
    fn test_missing_columns_display() {
        let err = IngestError::MissingColumns {
            path: PathBuf::from("sales.csv"),
            columns: vec!["price".to_string(), "cost".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "required columns missing from sales.csv: price, cost"
        );
    }
}
