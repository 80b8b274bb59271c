use tracing::debug;

use super::materialize::materialize;
use super::write::{write, WriteOptions};
use crate::connection::{
    with_connection, Connection, ParamStyle, ResultSet, SqliteConnection, Target,
};
use crate::error::{Error, Result};
use crate::parser::statements::{escape_percent, split_statements};
use crate::schema::{build_table_spec, SchemaOptions};
use crate::table::Table;

/// Name the table is staged under when the caller does not choose one.
pub const DEFAULT_STAGING_TABLE: &str = "agate";

/// Run a SQL script against a private in-memory copy of `table`.
///
/// `table` is staged as `staging_name` (default [`DEFAULT_STAGING_TABLE`]); the
/// script's statements run in order and only the last one's result is returned.
/// Result column types come from the result cursor, not from `table`.
pub fn query(table: &Table, sql: &str, staging_name: Option<&str>) -> Result<Table> {
    let name = staging_name.unwrap_or(DEFAULT_STAGING_TABLE);
    let mut connection = SqliteConnection::open_in_memory()?;
    let dialect = connection.dialect();

    let statements = split_statements(sql, dialect)?;
    if statements.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let spec = build_table_spec(table, name, dialect, &SchemaOptions::default())?;
    write(&mut connection, &spec, table.rows(), &WriteOptions::default())?;
    debug!(table = %name, rows = table.row_count(), "staged table");

    let mut last = None;
    for statement in &statements {
        last = Some(submit(&mut connection, statement)?);
    }
    let result = last.ok_or(Error::EmptyQuery)?;
    materialize(result, dialect)
}

/// Run one query directly against an existing database and materialize its rows.
pub fn query_external<'c>(target: impl Into<Target<'c>>, raw_query: &str) -> Result<Table> {
    if raw_query.trim().is_empty() {
        return Err(Error::EmptyQuery);
    }
    with_connection(target.into(), |connection| {
        let result = submit(connection, raw_query)?;
        materialize(result, connection.dialect())
    })
}

fn submit(connection: &mut dyn Connection, sql: &str) -> Result<ResultSet> {
    debug!(%sql, "running statement");
    match connection.param_style() {
        ParamStyle::Percent => connection.query(&escape_percent(sql)),
        _ => connection.query(sql),
    }
}
