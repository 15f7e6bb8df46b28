use std::{path::Path, sync::Arc};

use log::debug;

use super::{row_builder::RowBuilder, tokenizer::tokenize};
use crate::{
    core::{
        options::ParseOptions,
        schema::Schema,
        storage::{FileSystem, Storage},
        table::Table,
        validator::Validator,
    },
    error::{CsvError, CsvResult},
};

/// Parses CSV files into typed [`Table`]s.
///
/// All file access goes through the [`Storage`] given at construction, the
/// real file system by default.
///
/// # Examples
///
/// ```
/// use alpha_csv::core::options::ParseOptions;
/// use alpha_csv::core::schema::{ColumnType, Schema};
/// use alpha_csv::core::storage::MemoryStorage;
/// use alpha_csv::core::table::Value;
/// use alpha_csv::csv::csv_parser::CsvParser;
///
/// let storage = MemoryStorage::new();
/// storage.add_file("prices.csv", "# exported nightly\nItem;Price\nTea;\"1,45\"\n");
///
/// let schema = Schema::builder()
///     .column("Item", ColumnType::Text)
///     .column("Price", ColumnType::Float)
///     .build()
///     .unwrap();
/// let options = ParseOptions::new()
///     .delimiter(';')
///     .decimal_separator(',')
///     .check_headers(true);
///
/// let parser = CsvParser::with_storage(storage);
/// let table = parser
///     .parse_defined(schema, "prices.csv", &options, None)
///     .unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.value(0, "Price"), Some(&Value::Float(1.45)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct CsvParser<S: Storage = FileSystem> {
    storage: S,
}

impl CsvParser<FileSystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Storage> CsvParser<S> {
    pub fn with_storage(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Parses the file at `path` against a declared schema.
    ///
    /// Options and validators are checked before the file is read. The whole
    /// file is loaded before parsing starts and no table is returned if any
    /// line fails.
    pub fn parse_defined(
        &self,
        schema: impl Into<Arc<Schema>>,
        path: impl AsRef<Path>,
        options: &ParseOptions,
        validators: Option<&[Validator]>,
    ) -> CsvResult<Table> {
        let schema = schema.into();
        let path = path.as_ref();

        options.check()?;
        RowBuilder::new(&schema, options, validators)?;

        let lines = self
            .storage
            .read_all_lines(path, options.common.encoding)?;
        debug!("Parsing {} lines from {}", lines.len(), path.display());

        parse_lines(schema, &lines, options, validators)
    }

    /// Parses the file at `path` with every column read as text.
    ///
    /// The columns come from the first line that is not a comment: its
    /// fields are the column names when `contains_headers` is set, otherwise
    /// the columns are named `Column1`, `Column2`, ...
    ///
    /// Only the first line is read to infer the columns. When it is a comment
    /// or blank, the whole file is read once and used for both steps.
    pub fn parse_simple(
        &self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
        validators: Option<&[Validator]>,
    ) -> CsvResult<Table> {
        let path = path.as_ref();
        options.check()?;

        let first_line = self
            .storage
            .read_first_line(path, options.common.encoding)?;

        if !is_skipped(&first_line, options) {
            let schema = infer_schema(&first_line, options)?;
            return self.parse_defined(schema, path, options, validators);
        }

        let lines = self
            .storage
            .read_all_lines(path, options.common.encoding)?;
        let line = lines
            .iter()
            .find(|line| !is_skipped(line, options))
            .ok_or_else(|| CsvError::NotFound(path.to_path_buf()))?;
        let schema = infer_schema(line, options)?;
        debug!("Parsing {} lines from {}", lines.len(), path.display());

        parse_lines(schema, &lines, options, validators)
    }
}

/// Builds the all-text schema described by `line`.
pub fn infer_schema(line: &str, options: &ParseOptions) -> CsvResult<Schema> {
    let fields = tokenize(line, options);
    if options.contains_headers {
        Schema::all_text(fields)
    } else {
        Schema::all_text((1..=fields.len()).map(|index| format!("Column{index}")))
    }
}

/// Parses in-memory text; see [`parse_lines`].
pub fn parse_str(
    schema: impl Into<Arc<Schema>>,
    text: &str,
    options: &ParseOptions,
    validators: Option<&[Validator]>,
) -> CsvResult<Table> {
    parse_lines(schema, text.lines(), options, validators)
}

/// Parses already split lines against `schema`.
///
/// Row numbers in errors count every line, comments included, starting at 1.
pub fn parse_lines<I>(
    schema: impl Into<Arc<Schema>>,
    lines: I,
    options: &ParseOptions,
    validators: Option<&[Validator]>,
) -> CsvResult<Table>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    options.check()?;

    let mut table = Table::with_schema(schema.into());
    let schema = table.shared_schema();
    let builder = RowBuilder::new(&schema, options, validators)?;

    let mut data_row = 0;
    let mut skipped = 0;

    for (index, line) in lines.into_iter().enumerate() {
        let global_row = index + 1;
        let line = line.as_ref();

        if is_skipped(line, options) {
            skipped += 1;
            continue;
        }
        data_row += 1;

        let fields = tokenize(line, options);

        if data_row == 1 && options.contains_headers {
            check_header(&schema, &fields, global_row, options)?;
            continue;
        }

        let row = builder.build(global_row, fields)?;
        table.push_row(row)?;
    }

    debug!(
        "Parsed {} rows, skipped {} comment or blank lines",
        table.len(),
        skipped
    );
    Ok(table)
}

fn is_skipped(line: &str, options: &ParseOptions) -> bool {
    line.chars().next().is_none_or(|first| first == options.comment)
}

fn check_header(
    schema: &Schema,
    fields: &[String],
    row: usize,
    options: &ParseOptions,
) -> CsvResult<()> {
    if fields.len() != schema.len() {
        return Err(CsvError::StructuralMismatch {
            row,
            expected: schema.len(),
            found: fields.len(),
        });
    }

    if options.check_headers {
        for (position, (found, expected)) in fields.iter().zip(schema.names()).enumerate() {
            if found != expected {
                return Err(CsvError::HeaderMismatch {
                    position: position + 1,
                    found: found.clone(),
                    expected: expected.to_string(),
                });
            }
        }
    }
    Ok(())
}
