//! All error types for the paratranz-sync crate.
//!
//! These are returned from all fallible operations (reading tables, loading
//! mappings, persisting item stores, writing translations back).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("{file} does not contain column `{column}`, check the mapping file. Available columns: {available}")]
    MissingColumn {
        file: String,
        column: String,
        available: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0} has no header row")]
    MissingHeader(String),

    #[error("file {file}, row {row}: {id_columns}=\"{id}\" is not unique in the file")]
    DuplicateId {
        file: String,
        row: usize,
        id_columns: String,
        id: String,
    },

    #[error("invalid item key `{0}`")]
    InvalidKey(String),

    #[error("invalid stage value {0}")]
    InvalidStage(i64),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Whether the error only invalidates the mapping being processed.
    ///
    /// Duplicate ids are data integrity problems of one table; the remaining
    /// mappings of a run can still be processed.
    pub fn is_mapping_scoped(&self) -> bool {
        matches!(self, Error::DuplicateId { .. })
    }
}
