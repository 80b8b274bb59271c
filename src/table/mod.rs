/// Cell values and the logical column types they belong to.
pub mod value;

use std::collections::HashSet;

use serde::Serialize;

pub use value::{ColumnType, Value};

use crate::error::{Error, Result};

/// One row of a [`Table`], aligned positionally with its columns.
pub type Row = Vec<Value>;

/// A named, typed column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Logical type every non-null value in the column has.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    /// Creates a column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// An immutable, row-oriented table of typed values.
///
/// Construction checks that names are unique, every row is as wide as the column
/// list, and every non-null value matches its column's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from parallel name and type lists plus rows.
    pub fn new(
        column_names: Vec<String>,
        column_types: Vec<ColumnType>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        if column_names.len() != column_types.len() {
            return Err(Error::InvalidTable(format!(
                "{} column names but {} column types",
                column_names.len(),
                column_types.len()
            )));
        }
        let columns = column_names
            .into_iter()
            .zip(column_types)
            .map(|(name, column_type)| Column { name, column_type })
            .collect();
        Self::from_columns(columns, rows)
    }

    /// Builds a table from column definitions plus rows.
    pub fn from_columns(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate column name `{}`",
                    column.name
                )));
            }
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::InvalidTable(format!(
                    "row {row_index} has {} values but the table has {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            for (value, column) in row.iter().zip(&columns) {
                if let Some(actual) = value.column_type() {
                    if actual != column.column_type {
                        return Err(Error::InvalidTable(format!(
                            "row {row_index} holds a {actual} value in {} column `{}`",
                            column.column_type, column.name
                        )));
                    }
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Column definitions in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column types in order.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|c| c.column_type).collect()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Iterates over every value of the column at `index`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Returns `true` when any row holds a null in the column at `index`.
    pub fn has_nulls(&self, index: usize) -> bool {
        self.column_values(index).any(Value::is_null)
    }

    /// Longest text value in the column at `index`, in characters; 0 for no text.
    pub fn max_length(&self, index: usize) -> u64 {
        self.column_values(index)
            .filter_map(Value::as_str)
            .map(|s| s.chars().count() as u64)
            .max()
            .unwrap_or(0)
    }

    /// Largest count of fractional digits among the numbers in the column at `index`.
    pub fn max_precision(&self, index: usize) -> u32 {
        self.column_values(index)
            .filter_map(Value::as_number)
            .map(|d| d.normalize().scale())
            .max()
            .unwrap_or(0)
    }
}
