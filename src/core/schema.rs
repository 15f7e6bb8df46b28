use std::fmt;

use crate::error::{CsvError, CsvResult};

/// The type every field of a column is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    DateTime,
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::DateTime => "date-time",
            ColumnType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// An ordered list of named, typed columns.
///
/// The position of a column is the position of its field in every line of
/// the file. Names are unique.
///
/// ```
/// use alpha_csv::core::schema::{ColumnType, Schema};
///
/// let schema = Schema::builder()
///     .column("Name", ColumnType::Text)
///     .column("Age", ColumnType::Integer)
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.position("Age"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Creates a schema where every column holds text.
    pub fn all_text<I, N>(names: I) -> CsvResult<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        names
            .into_iter()
            .fold(Schema::builder(), |builder, name| {
                builder.column(name, ColumnType::Text)
            })
            .build()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    columns: Vec<Column>,
}

impl SchemaBuilder {
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(Column {
            name: name.into(),
            column_type,
        });
        self
    }

    pub fn build(self) -> CsvResult<Schema> {
        for (index, column) in self.columns.iter().enumerate() {
            if self.columns[..index].iter().any(|c| c.name == column.name) {
                return Err(CsvError::Configuration(format!(
                    "Column name `{}` is declared more than once",
                    column.name
                )));
            }
        }
        Ok(Schema {
            columns: self.columns,
        })
    }
}
