//! Line tokenizing, row building, parsing, writing and typed mapping.
//!
//! # Module Architecture
//!
//! A file goes through the parser in layers:
//!
//! 1. **tokenizer**: splits one line into its raw text fields, honouring the
//!    quote character.
//! 2. **row_builder**: checks the field count against the schema, trims and
//!    validates fields, and coerces each one to its column type.
//! 3. **csv_parser**: reads the file through a `Storage`, skips comment and
//!    blank lines, checks the header line, and collects rows into a `Table`.
//!
//! The way back is handled by **csv_writer**, which renders a `Table` as text
//! with CRLF line endings. **mapper** sits on top of the parser and turns rows
//! into serde-deserializable structs.
//!
//! # Example
//!
//! ```
//! use alpha_csv::core::options::{ParseOptions, WriteOptions};
//! use alpha_csv::core::storage::MemoryStorage;
//! use alpha_csv::csv::csv_parser::CsvParser;
//! use alpha_csv::csv::csv_writer::CsvWriter;
//!
//! let storage = MemoryStorage::new();
//! storage.add_file("in.csv", "Name,City\nAda,London\nGrace,\"New York, NY\"\n");
//!
//! let table = CsvParser::with_storage(storage.clone())
//!     .parse_simple("in.csv", &ParseOptions::default(), None)
//!     .unwrap();
//!
//! CsvWriter::with_storage(storage.clone())
//!     .write_file("out.csv", &table, &WriteOptions::default())
//!     .unwrap();
//!
//! assert_eq!(
//!     storage.contents_as_string("out.csv").unwrap(),
//!     "Name,City\r\nAda,London\r\nGrace,\"New York, NY\"\r\n"
//! );
//! ```

/// Quote-aware splitting of a line into fields
pub mod tokenizer;

/// Schema-driven conversion of tokenized lines into rows
pub mod row_builder;

/// Reading CSV files into tables
pub mod csv_parser;

/// Writing tables as CSV files
pub mod csv_writer;

/// Mapping parsed rows onto serde structs
pub mod mapper;
