//! Extension interface attaching the SQL operations to [`Table`].
//!
//! ```no_run
//! use agate_sql::{Table, TableSqlExt};
//!
//! # fn main() -> agate_sql::Result<()> {
//! let table = Table::from_sql("sqlite:///reports.db", "sales", &Default::default())?;
//! let totals = table.sql_query("select region, sum(amount) as total from agate group by region", None)?;
//! totals.to_sql("sqlite:///reports.db", "sales_by_region", &Default::default())?;
//! # Ok(())
//! # }
//! ```

use crate::connection::Target;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::ops::{self, ReadOptions, WriteOptions};
use crate::schema::{self, SchemaOptions, SqlTableSpec};
use crate::table::Table;

/// SQL operations available on [`Table`].
pub trait TableSqlExt: Sized {
    /// Read a live table. See [`ops::from_sql`].
    fn from_sql<'c>(
        target: impl Into<Target<'c>>,
        table_name: &str,
        options: &ReadOptions,
    ) -> Result<Self>;

    /// Run one query against a live database. See [`ops::query_external`].
    fn from_sql_query<'c>(target: impl Into<Target<'c>>, raw_query: &str) -> Result<Self>;

    /// Write this table to a database. See [`ops::to_sql`].
    fn to_sql<'c>(
        &self,
        target: impl Into<Target<'c>>,
        table_name: &str,
        options: &WriteOptions,
    ) -> Result<SqlTableSpec>;

    /// The `CREATE TABLE` statement for this table, without a connection.
    fn to_sql_create_statement(
        &self,
        table_name: &str,
        dialect: Dialect,
        options: &SchemaOptions,
    ) -> Result<String>;

    /// Query a staged copy of this table. See [`ops::query`].
    fn sql_query(&self, sql: &str, staging_name: Option<&str>) -> Result<Self>;
}

impl TableSqlExt for Table {
    fn from_sql<'c>(
        target: impl Into<Target<'c>>,
        table_name: &str,
        options: &ReadOptions,
    ) -> Result<Self> {
        ops::from_sql(target, table_name, options)
    }

    fn from_sql_query<'c>(target: impl Into<Target<'c>>, raw_query: &str) -> Result<Self> {
        ops::query_external(target, raw_query)
    }

    fn to_sql<'c>(
        &self,
        target: impl Into<Target<'c>>,
        table_name: &str,
        options: &WriteOptions,
    ) -> Result<SqlTableSpec> {
        ops::to_sql(self, target, table_name, options)
    }

    fn to_sql_create_statement(
        &self,
        table_name: &str,
        dialect: Dialect,
        options: &SchemaOptions,
    ) -> Result<String> {
        schema::create_statement(self, table_name, dialect, options)
    }

    fn sql_query(&self, sql: &str, staging_name: Option<&str>) -> Result<Self> {
        ops::query(self, sql, staging_name)
    }
}
