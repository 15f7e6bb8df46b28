#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 <div align="center">
   <h1>alpha-csv</h1>
   <h3>Schema-driven CSV parsing and serialization into typed tables</h3>

   ![license](https://shields.io/badge/license-MIT%2FApache--2.0-blue)

  </div>

 # alpha-csv

 **alpha-csv** reads delimited text files into in-memory tables whose columns carry
 a declared type, and writes such tables back out. Every row is checked against the
 column layout, every cell can be validated before it is converted, and every error
 tells you which line and which field were at fault.

 ## Core Concepts

- **Schema:** The ordered list of columns of a table, each with a name and a `ColumnType`
  (text, integer, float, date-time or boolean).
- **Table:** A schema plus the rows parsed against it. Every cell is a typed `Value`.
- **CsvParser:** Reads a file through a `Storage` and builds a `Table`, either from a
  declared schema (`parse_defined`) or from the file's own header line (`parse_simple`).
- **CsvWriter:** Renders a `Table` as CSV text with CRLF line endings and replaces the
  target file with it.
- **Mapper:** Turns the rows of a file into instances of any struct deriving
  `serde::Deserialize`, matching columns to fields by name.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| regex         | Enables `Validator::pattern`, building validators from regular expressions |
| full          | Enables all available features                                |

 ## Getting Started

```toml
[dependencies]
alpha-csv = { version = "<version>", features = ["<full|regex>"] }
```

Then, on your main.rs:

```rust
# use alpha_csv::{
#     core::{
#         options::{ParseOptions, WriteOptions},
#         schema::{ColumnType, Schema},
#         storage::MemoryStorage,
#         table::Value,
#     },
#     CsvError, CsvParser, CsvWriter,
# };
fn main() -> Result<(), CsvError> {
    let storage = MemoryStorage::new();
    storage.add_file(
        "cars.csv",
        "# cars in stock\nyear;make;price\n1948;Porsche;\"120000,50\"\n1995;Peugeot;3500\n",
    );

    let schema = Schema::builder()
        .column("year", ColumnType::Integer)
        .column("make", ColumnType::Text)
        .column("price", ColumnType::Float)
        .build()?;

    let options = ParseOptions::new()
        .delimiter(';')
        .decimal_separator(',')
        .check_headers(true);

    let table = CsvParser::with_storage(storage.clone())
        .parse_defined(schema, "cars.csv", &options, None)?;

    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "price"), Some(&Value::Float(120000.5)));

    CsvWriter::with_storage(storage.clone())
        .write_file("cars_out.csv", &table, &WriteOptions::default())?;

    assert_eq!(
        storage.contents_as_string("cars_out.csv").unwrap(),
        "year,make,price\r\n1948,Porsche,120000.5\r\n1995,Peugeot,3500\r\n"
    );

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Options, schemas, tables, storage and validators
pub mod core;

/// Error types for parsing and writing
pub mod error;

#[doc(inline)]
pub use error::*;

pub mod csv;

#[doc(inline)]
pub use self::csv::{csv_parser::CsvParser, csv_writer::CsvWriter, mapper::map_table};
