use std::{any::type_name, path::Path};

use ::csv::{ErrorKind, StringRecord};
use serde::{
    Deserialize, Deserializer,
    de::{self, DeserializeOwned, Visitor, value::Error as IntrospectionError},
    forward_to_deserialize_any,
};

use super::csv_parser::CsvParser;
use crate::{
    core::{
        options::{CsvOptions, ParseOptions},
        storage::Storage,
        table::Table,
        validator::Validator,
    },
    error::{CsvError, CsvResult},
};

impl<S: Storage> CsvParser<S> {
    /// Parses the file at `path` into instances of `T`, one per data row.
    ///
    /// `T` is any struct deriving `Deserialize`. Columns are matched to
    /// fields by name, so the column order of the file does not matter, but
    /// every column needs a field and every field a column.
    ///
    /// A cell that cannot be converted fails with [`CsvError::Format`] whose
    /// `row` counts data rows only, starting at 1.
    ///
    /// ```
    /// use alpha_csv::core::options::ParseOptions;
    /// use alpha_csv::core::storage::MemoryStorage;
    /// use alpha_csv::csv::csv_parser::CsvParser;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Deserialize, PartialEq)]
    /// struct Person {
    ///     name: String,
    ///     age: u8,
    /// }
    ///
    /// let storage = MemoryStorage::new();
    /// storage.add_file("people.csv", "age,name\n30,Alice\n25,Bob\n");
    ///
    /// let people: Vec<Person> = CsvParser::with_storage(storage)
    ///     .parse_as("people.csv", &ParseOptions::default(), None)
    ///     .unwrap();
    ///
    /// assert_eq!(people[0], Person { name: "Alice".to_string(), age: 30 });
    /// assert_eq!(people[1].age, 25);
    /// ```
    pub fn parse_as<T: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
        validators: Option<&[Validator]>,
    ) -> CsvResult<Vec<T>> {
        let fields = struct_fields::<T>()?;
        let table = self.parse_simple(path, options, validators)?;
        map_rows(&table, fields)
    }
}

/// Converts every row of `table` into a `T`, matching columns to fields by name.
///
/// Non-text cells are rendered with the default [`CsvOptions`] before conversion.
/// Conversion errors report the index of the row in `table`, starting at 1.
pub fn map_table<T: DeserializeOwned>(table: &Table) -> CsvResult<Vec<T>> {
    map_rows(table, struct_fields::<T>()?)
}

fn map_rows<T: DeserializeOwned>(table: &Table, fields: &[&str]) -> CsvResult<Vec<T>> {
    let schema = table.schema();

    if schema.len() != fields.len() {
        return Err(CsvError::Configuration(format!(
            "The number of parsed columns ({}) does not match the number of fields of {} ({})",
            schema.len(),
            type_name::<T>(),
            fields.len()
        )));
    }
    if let Some(name) = schema.names().find(|name| !fields.contains(name)) {
        return Err(CsvError::Configuration(format!(
            "There is no field named `{name}` in {}",
            type_name::<T>()
        )));
    }

    let headers = StringRecord::from(schema.names().collect::<Vec<_>>());
    let options = CsvOptions::default();

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let record = StringRecord::from(
                row.values()
                    .iter()
                    .map(|value| value.render(&options))
                    .collect::<Vec<_>>(),
            );
            record.deserialize::<T>(Some(&headers)).map_err(|error| {
                let field = match error.kind() {
                    ErrorKind::Deserialize { err, .. } => err.field().map(|f| f as usize),
                    _ => None,
                };
                CsvError::Format {
                    row: index + 1,
                    field: field.map_or(0, |f| f + 1),
                    text: field
                        .and_then(|f| record.get(f))
                        .unwrap_or_default()
                        .to_string(),
                    target: type_name::<T>().to_string(),
                    reason: error.to_string(),
                }
            })
        })
        .collect()
}

/// Field names of the struct `T` deserializes from, as serde sees them
/// (after `rename`, without `skip`ped fields).
pub fn struct_fields<'de, T: Deserialize<'de>>() -> CsvResult<&'static [&'static str]> {
    let mut fields = None;
    let _ = T::deserialize(FieldNames {
        fields: &mut fields,
    });
    fields.ok_or_else(|| {
        CsvError::Configuration(format!(
            "{} is not a struct with named fields",
            type_name::<T>()
        ))
    })
}

/// A deserializer that only records the field list of the struct asked for.
struct FieldNames<'a> {
    fields: &'a mut Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for FieldNames<'_> {
    type Error = IntrospectionError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        *self.fields = Some(fields);
        Err(de::Error::custom("field names recorded"))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
