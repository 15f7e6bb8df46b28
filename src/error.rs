use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type returned by every parse and write operation.
pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Error, Debug)]
/// CSV error
pub enum CsvError {
    /// Options, schema or validators are inconsistent with each other.
    #[error("Configuration: {0}")]
    Configuration(String),

    /// A line does not hold as many fields as the schema has columns.
    #[error("Row {row}: found {found} fields but the schema declares {expected} columns")]
    StructuralMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A header name differs from the declared column name at the same position.
    #[error("Header {position}: column names do not match, found `{found}` but expected `{expected}`")]
    HeaderMismatch {
        position: usize,
        found: String,
        expected: String,
    },

    /// A field was rejected by its validator. `field` is 1-based.
    #[error("Row {row}: field {field} with contents `{text}` did not pass validation")]
    Validation {
        row: usize,
        field: usize,
        text: String,
    },

    /// A field could not be converted to the type of its column. `field` is 1-based.
    ///
    /// `row` is the file line when raised while parsing, and the 1-based data
    /// row (header and comment lines not counted) when raised while mapping
    /// rows onto a type.
    #[error("Row {row}: field {field} with contents `{text}` is not a valid {target}: {reason}")]
    Format {
        row: usize,
        field: usize,
        text: String,
        target: String,
        reason: String,
    },

    /// A field holds the quote character but would be written unquoted.
    #[error("Field `{text}` contains the quote character but is not quoted")]
    WriteConflict { text: String },

    #[error("File {} has no lines", .0.display())]
    NotFound(PathBuf),

    #[error("File {} is not valid {encoding}", .path.display())]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("IO: {0}")]
    Io(#[from] io::Error),
}
