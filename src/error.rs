//! Error taxonomy for the mapping and codec core.
//!
//! Application layers (CLI, layout files, CSV I/O) use `anyhow` and wrap
//! these errors with context; the core itself only ever returns
//! [`MappingError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    /// A field name is blank or does not exist on the record type / mapper.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// A non-nullable column had no value in a data row.
    #[error("required field '{field}' is missing at row {row}")]
    RequiredFieldMissing { field: String, row: usize },

    /// A numeric column held a value that could not be read as a number.
    #[error("field '{field}' at row {row}, column {column}: '{value}' is not a valid number")]
    NumericFormat {
        field: String,
        row: usize,
        column: usize,
        value: String,
    },

    /// No column occupies the requested position.
    #[error("column index {index} is out of range (mapper holds {len} column(s))")]
    IndexOutOfRange { index: usize, len: usize },

    /// A field accessor received a value of the wrong kind. During decode the
    /// 1-based row is attached.
    #[error("field '{field}' expects {expected} but received {found}{}", row_suffix(.row))]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
        row: Option<usize>,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl MappingError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        MappingError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// 1-based row number for decode failures, when the error carries one.
    pub fn row(&self) -> Option<usize> {
        match self {
            MappingError::RequiredFieldMissing { row, .. }
            | MappingError::NumericFormat { row, .. } => Some(*row),
            MappingError::TypeMismatch { row, .. } => *row,
            _ => None,
        }
    }

    /// Name of the offending field, when the error carries one.
    pub fn field(&self) -> Option<&str> {
        match self {
            MappingError::InvalidField { field, .. }
            | MappingError::RequiredFieldMissing { field, .. }
            | MappingError::NumericFormat { field, .. }
            | MappingError::TypeMismatch { field, .. } => Some(field),
            MappingError::IndexOutOfRange { .. } | MappingError::Storage(_) => None,
        }
    }

    /// Attaches the decode row to errors raised without one.
    pub(crate) fn at_row(self, row_number: usize) -> Self {
        match self {
            MappingError::TypeMismatch {
                field,
                expected,
                found,
                row: None,
            } => MappingError::TypeMismatch {
                field,
                expected,
                found,
                row: Some(row_number),
            },
            other => other,
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|row| format!(" at row {row}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, MappingError>;
