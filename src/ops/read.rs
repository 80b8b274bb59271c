use serde::Deserialize;
use tracing::debug;

use super::materialize::materialize_as;
use crate::connection::{with_connection, Target};
use crate::error::Result;
use crate::parser::names::split_schema_and_relation;
use crate::schema::{introspect, SqlColumnSpec, SqlTableSpec};
use crate::table::Table;
use crate::types::to_sql_type;

/// How a live table is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Schema the table lives in.
    pub db_schema: Option<String>,
    /// Read at most this many rows.
    pub row_limit: Option<u64>,
}

/// Read a live table, typing its columns from the declared schema.
///
/// Without `options.db_schema`, a qualified `schema.table` name is split and its
/// schema part used; quoted parts such as `"my.schema"."t"` keep their dots.
pub fn from_sql<'c>(
    target: impl Into<Target<'c>>,
    table_name: &str,
    options: &ReadOptions,
) -> Result<Table> {
    with_connection(target.into(), |connection| {
        let dialect = connection.dialect();
        let (schema, table_name) = match &options.db_schema {
            Some(schema) => (Some(schema.clone()), table_name.to_string()),
            None => split_schema_and_relation(table_name),
        };
        let description = connection.describe_table(schema.as_deref(), &table_name)?;
        let columns = introspect(&description, dialect)?;

        let spec = SqlTableSpec {
            name: table_name.clone(),
            schema,
            columns: columns
                .iter()
                .zip(&description)
                .map(|(column, described)| SqlColumnSpec {
                    name: column.name.clone(),
                    sql_type: to_sql_type(column.column_type, dialect),
                    nullable: described.nullable,
                })
                .collect(),
            unique: None,
            prefixes: Vec::new(),
            dialect,
        };

        let result = connection.query(&spec.select_statement(options.row_limit))?;
        debug!(table = %table_name, rows = result.rows.len(), "read table");
        materialize_as(result, columns)
    })
}
