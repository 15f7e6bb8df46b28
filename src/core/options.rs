use encoding_rs::{Encoding, UTF_8};

use crate::error::{CsvError, CsvResult};

/// Options shared by parsing and writing.
///
/// # Default Configuration
///
/// - Delimiter: comma (`,`)
/// - Quote character: double quote (`"`)
/// - Date format: unset (free-form parsing, ISO-like output)
/// - Decimal separator: dot (`.`)
/// - Encoding: UTF-8
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// The field delimiter
    pub delimiter: char,
    /// The character enclosing fields that contain the delimiter
    pub quote: char,
    /// A chrono strftime format (for example `%d-%b-%Y`) for date-time columns
    pub date_format: Option<String>,
    /// The separator between the integral and fractional part of floats
    pub decimal_separator: char,
    /// The text encoding of the file
    pub encoding: &'static Encoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            date_format: None,
            decimal_separator: '.',
            encoding: UTF_8,
        }
    }
}

/// Options controlling how a CSV file is parsed.
///
/// Every setter consumes and returns `self` so options can be chained:
///
/// ```
/// use alpha_csv::core::options::ParseOptions;
///
/// let options = ParseOptions::new()
///     .delimiter(';')
///     .decimal_separator(',')
///     .check_headers(true);
///
/// assert_eq!(options.common.delimiter, ';');
/// assert!(options.contains_headers);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub common: CsvOptions,
    /// Lines starting with this character are ignored (default: `#`)
    pub comment: char,
    /// The first non-comment line holds the column names (default: true)
    pub contains_headers: bool,
    /// Compare the header names against the schema (default: false)
    pub check_headers: bool,
    /// Run the supplied validators on every field (default: false)
    pub validate_fields: bool,
    /// Trim whitespace around every field (default: false)
    pub trim_fields: bool,
    /// A trailing delimiter yields one more, empty, field (default: true)
    ///
    /// Some programs write nothing at all, not even an empty quote, when the
    /// last field of a record is empty.
    pub allow_empty_last_field: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            common: CsvOptions::default(),
            comment: '#',
            contains_headers: true,
            check_headers: false,
            validate_fields: false,
            trim_fields: false,
            allow_empty_last_field: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.common.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.common.quote = quote;
        self
    }

    pub fn comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.common.date_format = Some(format.into());
        self
    }

    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.common.decimal_separator = separator;
        self
    }

    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.common.encoding = encoding;
        self
    }

    pub fn contains_headers(mut self, yes: bool) -> Self {
        self.contains_headers = yes;
        self
    }

    pub fn check_headers(mut self, yes: bool) -> Self {
        self.check_headers = yes;
        self
    }

    pub fn validate_fields(mut self, yes: bool) -> Self {
        self.validate_fields = yes;
        self
    }

    pub fn trim_fields(mut self, yes: bool) -> Self {
        self.trim_fields = yes;
        self
    }

    pub fn allow_empty_last_field(mut self, yes: bool) -> Self {
        self.allow_empty_last_field = yes;
        self
    }

    /// Rejects option sets where the delimiter, quote and comment characters collide.
    pub fn check(&self) -> CsvResult<()> {
        let CsvOptions {
            delimiter, quote, ..
        } = self.common;

        if delimiter == quote {
            return Err(CsvError::Configuration(format!(
                "The delimiter and the quote character are both `{delimiter}`"
            )));
        }
        if self.comment == delimiter || self.comment == quote {
            return Err(CsvError::Configuration(format!(
                "The comment character `{}` is also used as delimiter or quote character",
                self.comment
            )));
        }
        Ok(())
    }
}

/// Options controlling how a table is written.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub common: CsvOptions,
    /// Emit the column names as the first line (default: true)
    pub write_headers: bool,
    /// Quote every field, not only the ones holding the delimiter (default: false)
    pub quote_fields_unconditionally: bool,
    /// Fail with [`CsvError::WriteConflict`] instead of emitting a bare
    /// quote character in an unquoted field (default: false)
    pub reject_unquoted_quotes: bool,
    /// Quote the first field of a line when a parser would otherwise skip
    /// the line: it starts with `comment`, or it is the only field and is
    /// empty (default: false)
    pub quote_ambiguous_starts: bool,
    /// The comment character of the parser the output is meant for (default: `#`)
    pub comment: char,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            common: CsvOptions::default(),
            write_headers: true,
            quote_fields_unconditionally: false,
            reject_unquoted_quotes: false,
            quote_ambiguous_starts: false,
            comment: '#',
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.common.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.common.quote = quote;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.common.date_format = Some(format.into());
        self
    }

    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.common.decimal_separator = separator;
        self
    }

    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.common.encoding = encoding;
        self
    }

    pub fn write_headers(mut self, yes: bool) -> Self {
        self.write_headers = yes;
        self
    }

    pub fn quote_fields_unconditionally(mut self, yes: bool) -> Self {
        self.quote_fields_unconditionally = yes;
        self
    }

    pub fn reject_unquoted_quotes(mut self, yes: bool) -> Self {
        self.reject_unquoted_quotes = yes;
        self
    }

    pub fn quote_ambiguous_starts(mut self, yes: bool) -> Self {
        self.quote_ambiguous_starts = yes;
        self
    }

    pub fn comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn check(&self) -> CsvResult<()> {
        let CsvOptions {
            delimiter, quote, ..
        } = self.common;

        if delimiter == quote {
            return Err(CsvError::Configuration(format!(
                "The delimiter and the quote character are both `{delimiter}`"
            )));
        }
        if self.quote_ambiguous_starts && (self.comment == delimiter || self.comment == quote) {
            return Err(CsvError::Configuration(format!(
                "The comment character `{}` is also used as delimiter or quote character",
                self.comment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::WINDOWS_1252;

    use super::{ParseOptions, WriteOptions};
    use crate::error::CsvError;

    #[test]
    fn default_parse_options_should_match_common_csv() {
        let options = ParseOptions::default();

        assert_eq!(options.common.delimiter, ',');
        assert_eq!(options.common.quote, '"');
        assert_eq!(options.comment, '#');
        assert_eq!(options.common.decimal_separator, '.');
        assert_eq!(options.common.date_format, None);
        assert!(options.contains_headers);
        assert!(!options.check_headers);
        assert!(options.allow_empty_last_field);
        assert!(options.check().is_ok());
    }

    #[test]
    fn setters_should_chain() {
        let options = ParseOptions::new()
            .delimiter('\t')
            .quote('\'')
            .comment(';')
            .date_format("%d-%b-%Y")
            .encoding(WINDOWS_1252)
            .trim_fields(true);

        assert_eq!(options.common.delimiter, '\t');
        assert_eq!(options.common.quote, '\'');
        assert_eq!(options.comment, ';');
        assert_eq!(options.common.date_format.as_deref(), Some("%d-%b-%Y"));
        assert_eq!(options.common.encoding, WINDOWS_1252);
        assert!(options.trim_fields);
    }

    #[test]
    fn colliding_characters_should_be_rejected() {
        let same_quote = ParseOptions::new().quote(',');
        assert!(matches!(same_quote.check(), Err(CsvError::Configuration(_))));

        let same_comment = ParseOptions::new().comment(',');
        assert!(matches!(same_comment.check(), Err(CsvError::Configuration(_))));

        let write = WriteOptions::new().delimiter('"');
        assert!(matches!(write.check(), Err(CsvError::Configuration(_))));
    }

    #[test]
    fn default_write_options_should_write_headers() {
        let options = WriteOptions::default();

        assert!(options.write_headers);
        assert!(!options.quote_fields_unconditionally);
        assert!(!options.reject_unquoted_quotes);
        assert!(!options.quote_ambiguous_starts);
        assert_eq!(options.comment, '#');
    }

    #[test]
    fn comment_colliding_with_delimiter_should_matter_only_when_quoting_starts() {
        let options = WriteOptions::default().comment(',');

        assert!(options.check().is_ok());
        assert!(matches!(
            options.quote_ambiguous_starts(true).check(),
            Err(CsvError::Configuration(_))
        ));
    }
}
