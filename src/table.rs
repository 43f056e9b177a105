use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// A single row, mapping column names to cell values.
pub type Row = IndexMap<Box<str>, Value>;

/// Errors raised while loading a table from an external source.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// A single cell of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    Missing,
}

impl Value {
    /// The cell as a class label. Only string cells are labels.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The cell as an observation count. Only non-negative integer cells are counts.
    pub fn as_count(&self) -> Option<u64> {
        match *self {
            Value::Int(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Read-only access to a row-oriented dataset.
pub trait Table {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Names of every column in the table schema.
    fn column_names(&self) -> Vec<&str>;

    /// Looks up the cell at `row` in `column`.
    fn value(&self, row: usize, column: &str) -> Option<&Value>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_column(&self, column: &str) -> bool {
        self.column_names().contains(&column)
    }
}

/// An in-memory table backed by a list of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Row>", into = "Vec<Row>")]
pub struct RowTable {
    /// Column names in order of first appearance.
    columns: IndexSet<Box<str>>,
    rows: Vec<Row>,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table that still carries a schema.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, registering any column not seen before.
    pub fn push_row(&mut self, row: Row) {
        for name in row.keys() {
            if !self.columns.contains(name) {
                self.columns.insert(name.clone());
            }
        }
        self.rows.push(row);
    }

    /// Loads a table from a JSON array of objects.
    pub fn load_from_file(file: &mut dyn Read) -> Result<Self, TableError> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        Ok(serde_json::from_str(&buffer)?)
    }

    /// Saves the table as a JSON array of objects.
    pub fn save_to_file(&self, file: &mut dyn std::io::Write) -> Result<(), TableError> {
        let serialized = serde_json::to_string(self)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }
}

impl Table for RowTable {
    #[inline]
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(AsRef::as_ref).collect()
    }

    fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row)?.get(column)
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }
}

impl FromIterator<Row> for RowTable {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        let mut table = RowTable::new();
        iter.into_iter().for_each(|row| table.push_row(row));
        table
    }
}

impl From<Vec<Row>> for RowTable {
    fn from(rows: Vec<Row>) -> Self {
        rows.into_iter().collect()
    }
}

impl From<RowTable> for Vec<Row> {
    fn from(table: RowTable) -> Self {
        table.rows
    }
}

/// Builds a [`Row`] from `column => value` pairs.
#[macro_export]
macro_rules! row {
    ($($column:expr => $value:expr),* $(,)?) => {{
        let mut row = $crate::table::Row::new();
        $(row.insert(::std::convert::Into::into($column), $crate::table::Value::from($value));)*
        row
    }};
}
