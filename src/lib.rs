//! Move tabular data in and out of SQL databases.
//!
//! Tables are written with a schema inferred from their data, read back with
//! column types inferred from the database's declared schema, and queried with SQL
//! through a private in-memory SQLite copy.
#![warn(missing_docs)]

/// Database connections, result sets, and the bundled SQLite driver.
pub mod connection;
/// SQL dialects and their capabilities.
pub mod dialect;
/// Error type shared by every operation.
pub mod error;
/// SQL operations attached to [`Table`] through an extension trait.
pub mod ext;
/// Reading, writing, and querying tables.
pub mod ops;
/// SQL text helpers: identifier quoting, type-name parsing, statement splitting.
pub mod parser;
/// SQL table definitions built from tables and resolved from live schemas.
pub mod schema;
/// The tabular data model.
pub mod table;
/// Mapping between tabular column types and SQL column types.
pub mod types;

pub use connection::{Connection, SqliteConnection, Target};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use ext::TableSqlExt;
pub use ops::{CreateMode, ReadOptions, WriteOptions};
pub use schema::{SchemaOptions, SqlTableSpec};
pub use table::{Column, ColumnType, Row, Table, Value};
