use std::mem;

use crate::core::options::ParseOptions;

/// Splits one line into its fields.
///
/// The line is scanned left to right with a single "inside quotes" flag:
///
/// - A quote opens a quoted field when nothing has been accumulated yet and
///   the last significant character was not itself a quote; any other quote
///   closes it. An empty quoted field (`""`) therefore yields an empty field
///   instead of toggling back into a quoted state.
/// - A delimiter inside quotes is field data, otherwise it ends the field.
///   A delimiter ending the line adds an empty last field when
///   `allow_empty_last_field` is set.
/// - `\n` ends the field (an empty one only when `allow_empty_last_field` is
///   set); `\r` is dropped.
/// - The last character of the line always flushes the pending field.
///
/// Doubled quote characters are not collapsed: each one opens or closes
/// quoting, so `"a""b"` yields `ab`.
///
/// ```
/// use alpha_csv::core::options::ParseOptions;
/// use alpha_csv::csv::tokenizer::tokenize;
///
/// let options = ParseOptions::default();
///
/// assert_eq!(tokenize("\"He,llo\",World", &options), vec!["He,llo", "World"]);
/// assert_eq!(tokenize("\"Hello\",\"\"", &options), vec!["Hello", ""]);
/// ```
pub fn tokenize(line: &str, options: &ParseOptions) -> Vec<String> {
    let delimiter = options.common.delimiter;
    let quote = options.common.quote;

    let mut fields = Vec::new();
    let mut inside_quotes = false;
    let mut current = String::new();
    // Only updated by quotes, field-ending delimiters, line feeds and the final character.
    let mut previous: Option<char> = None;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        let is_last = chars.peek().is_none();

        if c == quote {
            inside_quotes = current.is_empty() && previous != Some(quote);
            previous = Some(c);
            if is_last {
                fields.push(mem::take(&mut current));
            }
        } else if c == delimiter {
            if inside_quotes {
                current.push(c);
            } else {
                fields.push(mem::take(&mut current));
                previous = Some(c);
                if is_last && options.allow_empty_last_field {
                    fields.push(String::new());
                }
            }
        } else if c == '\n' {
            if !current.is_empty() || options.allow_empty_last_field {
                fields.push(mem::take(&mut current));
                previous = Some(c);
            }
        } else if c == '\r' {
            continue;
        } else {
            current.push(c);
            if is_last {
                fields.push(mem::take(&mut current));
                previous = Some(c);
            }
        }
    }

    fields
}
