//! Store error types

use thiserror::Error;

/// Directory store errors
///
/// `SchemaMismatch` and `InvalidRow` indicate a corrupted or incompatible
/// store; they are fatal for the operation and never retried. `KeyNotFound`
/// and `UnknownColumn` fail an update call as a whole - no partial
/// application.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error accessing store: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not a valid workbook: {0}")]
    Format(#[from] serde_json::Error),

    #[error("workbook has no sheet named {sheet:?}")]
    MissingSheet { sheet: &'static str },

    #[error("schema mismatch in sheet {sheet:?}: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        sheet: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid row {row} in sheet {sheet:?}: {reason}")]
    InvalidRow {
        sheet: &'static str,
        row: usize,
        reason: String,
    },

    #[error("no row in sheet {sheet:?} with {column} = {value:?}")]
    KeyNotFound {
        sheet: &'static str,
        column: String,
        value: String,
    },

    #[error("sheet {sheet:?} has no column named {column:?}")]
    UnknownColumn {
        sheet: &'static str,
        column: String,
    },
}
