/// Parse and write options
pub mod options;

/// Column declarations
pub mod schema;

/// Typed tables, rows and cell values
pub mod table;

/// File access used by the parser and the writer
pub mod storage;

/// Per-field validation predicates
pub mod validator;
