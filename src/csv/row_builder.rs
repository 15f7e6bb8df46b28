use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;

use crate::{
    core::{
        options::ParseOptions,
        schema::{Column, ColumnType, Schema},
        table::{Row, Value},
        validator::Validator,
    },
    error::{CsvError, CsvResult},
};

/// Formats tried, in order, when no date format is configured.
const FREE_FORM_DATE_TIMES: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const FREE_FORM_DATES: &[&str] = &[
    "%Y-%m-%d", "%d-%b-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y",
];

/// Turns the fields of one line into a typed [`Row`].
///
/// Fields are trimmed first when `trim_fields` is set, then every validator
/// runs (stopping at the first failure) and finally each field is converted
/// to the type of its column.
#[derive(Debug)]
pub struct RowBuilder<'a> {
    schema: &'a Schema,
    options: &'a ParseOptions,
    validators: &'a [Validator],
}

impl<'a> RowBuilder<'a> {
    /// Fails when validation is enabled but validators are missing or do not
    /// match the column count.
    pub fn new(
        schema: &'a Schema,
        options: &'a ParseOptions,
        validators: Option<&'a [Validator]>,
    ) -> CsvResult<Self> {
        let validators = match (options.validate_fields, validators) {
            (false, _) => &[][..],
            (true, None) => {
                return Err(CsvError::Configuration(
                    "Field validation was requested but no validators were provided".to_string(),
                ));
            }
            (true, Some(validators)) if validators.len() != schema.len() => {
                return Err(CsvError::Configuration(format!(
                    "The number of validators ({}) does not match the number of columns in the schema ({})",
                    validators.len(),
                    schema.len()
                )));
            }
            (true, Some(validators)) => validators,
        };

        Ok(Self {
            schema,
            options,
            validators,
        })
    }

    /// Builds the row for `fields`, read from line `row` of the file.
    pub fn build(&self, row: usize, fields: Vec<String>) -> CsvResult<Row> {
        if fields.len() != self.schema.len() {
            return Err(CsvError::StructuralMismatch {
                row,
                expected: self.schema.len(),
                found: fields.len(),
            });
        }

        let fields: Vec<String> = if self.options.trim_fields {
            fields.into_iter().map(|f| f.trim().to_string()).collect()
        } else {
            fields
        };

        for (index, (validator, text)) in self.validators.iter().zip(&fields).enumerate() {
            if !validator.is_valid(text) {
                return Err(CsvError::Validation {
                    row,
                    field: index + 1,
                    text: text.clone(),
                });
            }
        }

        let values = self
            .schema
            .columns()
            .iter()
            .zip(fields)
            .enumerate()
            .map(|(index, (column, text))| self.coerce(row, index, column, text))
            .collect::<CsvResult<Vec<Value>>>()?;

        Ok(Row::new(values))
    }

    fn coerce(&self, row: usize, index: usize, column: &Column, text: String) -> CsvResult<Value> {
        let failure = |text: &str, reason: String| CsvError::Format {
            row,
            field: index + 1,
            text: text.to_string(),
            target: column.column_type.to_string(),
            reason,
        };

        match column.column_type {
            ColumnType::Text => Ok(Value::Text(text)),
            ColumnType::Integer => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| failure(&text, e.to_string())),
            ColumnType::Float => {
                let separator = self.options.common.decimal_separator;
                let normalized = if separator == '.' {
                    text.trim().to_string()
                } else {
                    text.trim().replace(separator, ".")
                };
                normalized
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| failure(&text, e.to_string()))
            }
            ColumnType::DateTime => match self.options.common.date_format.as_deref() {
                Some(format) if !format.is_empty() => parse_date_time_exact(&text, format)
                    .map(Value::DateTime)
                    .map_err(|e| failure(&text, e.to_string())),
                _ => Ok(Value::DateTime(parse_date_time_lenient(&text).unwrap_or_else(
                    || {
                        warn!(
                            "Row {row}: `{text}` is not a recognised date, using the minimum date-time"
                        );
                        NaiveDateTime::MIN
                    },
                ))),
            },
            ColumnType::Boolean => parse_boolean(&text)
                .map(Value::Boolean)
                .ok_or_else(|| failure(&text, "expected `true` or `false`".to_string())),
        }
    }
}

/// Parses `text` against a strftime `format`; a format without time fields yields midnight.
pub fn parse_date_time_exact(text: &str, format: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format).or_else(|error| {
        NaiveDate::parse_from_str(text, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| error)
    })
}

/// Tries RFC 3339 and a fixed list of common layouts, returning `None` when none fits.
pub fn parse_date_time_lenient(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.naive_local());
    }

    FREE_FORM_DATE_TIMES
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            FREE_FORM_DATES
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn parse_boolean(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
