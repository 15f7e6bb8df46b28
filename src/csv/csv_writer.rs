use std::{io::Write, path::Path};

use log::debug;

use crate::{
    core::{
        options::WriteOptions,
        storage::{FileSystem, Storage},
        table::Table,
    },
    error::{CsvError, CsvResult},
};

/// Line terminator written after every line, whatever the platform.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Writes [`Table`]s as CSV files through a [`Storage`].
#[derive(Debug, Default, Clone)]
pub struct CsvWriter<S: Storage = FileSystem> {
    storage: S,
}

impl CsvWriter<FileSystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Storage> CsvWriter<S> {
    pub fn with_storage(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces the file at `path` with the CSV text of `table`.
    ///
    /// The text is built and encoded before anything on disk changes. The
    /// sink is flushed before returning and released on every path.
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        table: &Table,
        options: &WriteOptions,
    ) -> CsvResult<()> {
        let path = path.as_ref();
        let text = write_table(table, options)?;

        let encoding = options.common.encoding;
        let (bytes, used, had_errors) = encoding.encode(&text);
        if had_errors {
            return Err(CsvError::Encoding {
                path: path.to_path_buf(),
                encoding: used.name(),
            });
        }

        // The sink does not truncate, so stale content would survive a shorter write.
        if self.storage.exists(path) {
            self.storage.delete(path)?;
        }

        let mut sink = self.storage.open_for_write(path)?;
        sink.write_all(&bytes)?;
        sink.flush()?;

        debug!(
            "Wrote {} rows ({} bytes) to {}",
            table.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

/// Renders `table` as CSV text: an optional header line, then one line per
/// row, every line ending with CRLF.
///
/// By default a line whose first field starts with the comment character, or
/// whose only field is empty, is written as-is and will be skipped when the
/// text is parsed again. Set
/// [`WriteOptions::quote_ambiguous_starts`](crate::core::options::WriteOptions)
/// to quote such fields so every row survives a round trip.
///
/// ```
/// use alpha_csv::core::options::WriteOptions;
/// use alpha_csv::core::schema::Schema;
/// use alpha_csv::core::table::{Row, Table};
/// use alpha_csv::csv::csv_writer::write_table;
///
/// let mut table = Table::new(Schema::all_text(["City", "Country"]).unwrap());
/// table
///     .push_row(Row::new(vec!["Washington, D.C.".into(), "United States".into()]))
///     .unwrap();
///
/// let text = write_table(&table, &WriteOptions::default()).unwrap();
/// assert_eq!(text, "City,Country\r\n\"Washington, D.C.\",United States\r\n");
/// ```
pub fn write_table(table: &Table, options: &WriteOptions) -> CsvResult<String> {
    options.check()?;

    let mut out = String::new();

    if options.write_headers {
        write_line(&mut out, table.schema().names(), options)?;
    }

    for row in table.rows() {
        let fields = row.values().iter().map(|value| value.render(&options.common));
        write_line(&mut out, fields, options)?;
    }

    Ok(out)
}

fn write_line<I>(out: &mut String, fields: I, options: &WriteOptions) -> CsvResult<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut fields = fields.into_iter().peekable();
    let mut first = true;

    while let Some(field) = fields.next() {
        let field = field.as_ref();
        let force_quotes = if first {
            let only = fields.peek().is_none();
            options.quote_ambiguous_starts
                && (field.starts_with(options.comment) || (only && field.is_empty()))
        } else {
            out.push(options.common.delimiter);
            false
        };
        first = false;

        write_quoted_if(out, field, force_quotes, options)?;
    }
    out.push_str(LINE_TERMINATOR);
    Ok(())
}

/// Appends one field, quoting it when it holds the delimiter or when every
/// field is quoted. Quote characters are doubled inside quoted fields only;
/// an unquoted field keeps them as they are unless `reject_unquoted_quotes`
/// is set.
pub fn write_field(out: &mut String, field: &str, options: &WriteOptions) -> CsvResult<()> {
    write_quoted_if(out, field, false, options)
}

fn write_quoted_if(
    out: &mut String,
    field: &str,
    force_quotes: bool,
    options: &WriteOptions,
) -> CsvResult<()> {
    let delimiter = options.common.delimiter;
    let quote = options.common.quote;

    let quoted = force_quotes || options.quote_fields_unconditionally || field.contains(delimiter);

    if !quoted {
        if options.reject_unquoted_quotes && field.contains(quote) {
            return Err(CsvError::WriteConflict {
                text: field.to_string(),
            });
        }
        out.push_str(field);
        return Ok(());
    }

    out.push(quote);
    for c in field.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    Ok(())
}
