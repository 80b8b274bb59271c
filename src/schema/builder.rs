use serde::Deserialize;

use super::spec::{SqlColumnSpec, SqlTableSpec};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::table::{ColumnType, Table};
use crate::types::{to_sql_type, SqlType};

/// How a table definition is derived from a tabular table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Schema to qualify the table name with.
    pub db_schema: Option<String>,
    /// Infer NOT NULL markers and text lengths from the data.
    pub constraints: bool,
    /// Columns of a UNIQUE constraint; empty for none.
    pub unique_constraint: Vec<String>,
    /// Smallest length a bounded text column is given.
    pub min_col_len: u64,
    /// Factor applied to the longest observed text before rounding up.
    pub col_len_multiplier: f64,
    /// Keywords placed between `CREATE` and `TABLE`, e.g. `TEMPORARY`.
    pub prefixes: Vec<String>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            db_schema: None,
            constraints: true,
            unique_constraint: Vec::new(),
            min_col_len: 1,
            col_len_multiplier: 1.0,
            prefixes: Vec::new(),
        }
    }
}

/// Derive a SQL table definition from `table`'s columns and data.
///
/// With constraints enabled, each column's nullability and each text column's
/// length come from a full scan of the rows. Pure: no database is touched.
pub fn build_table_spec(
    table: &Table,
    table_name: &str,
    dialect: Dialect,
    options: &SchemaOptions,
) -> Result<SqlTableSpec> {
    if !options.col_len_multiplier.is_finite() || options.col_len_multiplier <= 0.0 {
        return Err(Error::InvalidOption(format!(
            "col_len_multiplier must be a positive number, got {}",
            options.col_len_multiplier
        )));
    }

    let unique = if options.unique_constraint.is_empty() {
        None
    } else {
        for name in &options.unique_constraint {
            if table.column_index(name).is_none() {
                return Err(Error::UnknownColumn(name.clone()));
            }
        }
        Some(options.unique_constraint.clone())
    };

    let columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| SqlColumnSpec {
            name: column.name.clone(),
            sql_type: column_sql_type(table, index, column.column_type, dialect, options),
            nullable: column_nullable(table, index, column.column_type, dialect, options),
        })
        .collect();

    Ok(SqlTableSpec {
        name: table_name.to_string(),
        schema: options.db_schema.clone(),
        columns,
        unique,
        prefixes: options.prefixes.clone(),
        dialect,
    })
}

/// The `CREATE TABLE` statement `table` would be written with, without any connection.
pub fn create_statement(
    table: &Table,
    table_name: &str,
    dialect: Dialect,
    options: &SchemaOptions,
) -> Result<String> {
    Ok(build_table_spec(table, table_name, dialect, options)?.create_statement(false))
}

fn column_sql_type(
    table: &Table,
    index: usize,
    column_type: ColumnType,
    dialect: Dialect,
    options: &SchemaOptions,
) -> SqlType {
    let sql_type = to_sql_type(column_type, dialect);
    if !options.constraints {
        return sql_type;
    }

    let caps = dialect.capabilities();
    match column_type {
        ColumnType::Text => {
            let longest = table.max_length(index) as f64 * options.col_len_multiplier;
            let length = (longest.ceil() as u64).max(options.min_col_len).max(1);
            match caps.max_varchar_length {
                Some(ceiling) if length > ceiling => SqlType::Text,
                _ => SqlType::Varchar {
                    length: Some(length),
                },
            }
        }
        ColumnType::Number => match caps.decimal_precision {
            Some(precision) => SqlType::Decimal {
                precision: Some(precision),
                scale: Some(table.max_precision(index)),
            },
            None => sql_type,
        },
        _ => sql_type,
    }
}

fn column_nullable(
    table: &Table,
    index: usize,
    column_type: ColumnType,
    dialect: Dialect,
    options: &SchemaOptions,
) -> bool {
    // Strict MySQL modes reject NOT NULL timestamps without a default.
    if dialect == Dialect::Mysql && column_type == ColumnType::DateTime {
        return true;
    }
    !options.constraints || table.has_nulls(index)
}
