/// Bundled SQLite driver built on `rusqlite`.
pub mod sqlite;

pub use sqlite::SqliteConnection;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::table::Row;

/// How a driver expects positional parameters to be written in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:1`, `:2`, ...
    Colon,
    /// `%s`; literal `%` in SQL text must be doubled.
    Percent,
}

impl ParamStyle {
    /// Placeholder for the zero-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            ParamStyle::Question => "?".to_string(),
            ParamStyle::Dollar => format!("${}", index + 1),
            ParamStyle::Colon => format!(":{}", index + 1),
            ParamStyle::Percent => "%s".to_string(),
        }
    }
}

/// A cell as a driver returns it, before it is decoded into a tabular value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Integer storage.
    Integer(i64),
    /// Floating-point storage.
    Real(f64),
    /// Text storage.
    Text(String),
    /// Binary storage.
    Blob(Vec<u8>),
}

/// A result column as described by the driver's cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    /// Column label.
    pub name: String,
    /// Declared SQL type, when the column comes straight from a table column.
    pub decl_type: Option<String>,
}

/// Rows and cursor metadata returned by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Result columns in order.
    pub columns: Vec<ResultColumn>,
    /// Raw rows, each as wide as `columns`.
    pub rows: Vec<Vec<SqlValue>>,
}

/// One column of a live table as the database declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Set when the driver reports the column as the dialect's native interval type.
    pub native_interval: bool,
    /// Whether the column accepts nulls.
    pub nullable: bool,
}

impl ColumnDescription {
    /// Describes a nullable column with a declared type.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            native_interval: false,
            nullable: true,
        }
    }
}

/// A live database connection the operations of this crate run against.
///
/// Implementations execute statements synchronously on the caller's thread and do
/// not manage transactions across calls; [`Connection::insert_batch`] is the only
/// operation expected to be a single bulk unit.
pub trait Connection {
    /// Dialect the connection speaks.
    fn dialect(&self) -> Dialect;

    /// Placeholder style used for parameterized statements.
    fn param_style(&self) -> ParamStyle {
        self.dialect().capabilities().param_style
    }

    /// Execute one statement that returns no rows; returns the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Whether `table` exists, optionally inside `schema`.
    fn table_exists(&mut self, schema: Option<&str>, table: &str) -> Result<bool>;

    /// Declared columns of `table` in storage order.
    ///
    /// Fails with [`Error::TableNotFound`] when the table does not exist.
    fn describe_table(
        &mut self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ColumnDescription>>;

    /// Run the parameterized `statement` once per row as one bulk operation.
    fn insert_batch(&mut self, statement: &str, rows: &[Row]) -> Result<u64>;

    /// Run a statement and collect every row it returns.
    fn query(&mut self, sql: &str) -> Result<ResultSet>;
}

/// Where an operation should run: an already-open connection or a locator to open.
pub enum Target<'c> {
    /// A connection owned by the caller; left open afterwards.
    Open(&'c mut dyn Connection),
    /// A connection string; opened for the operation and closed afterwards.
    Locator(String),
}

impl<'c, C: Connection> From<&'c mut C> for Target<'c> {
    fn from(connection: &'c mut C) -> Self {
        Target::Open(connection)
    }
}

impl From<&str> for Target<'_> {
    fn from(locator: &str) -> Self {
        Target::Locator(locator.to_string())
    }
}

impl From<String> for Target<'_> {
    fn from(locator: String) -> Self {
        Target::Locator(locator)
    }
}

/// Open a connection from a locator string.
///
/// Only the bundled SQLite driver is available; any other scheme fails with
/// [`Error::Connection`].
pub fn open(locator: &str) -> Result<Box<dyn Connection>> {
    if SqliteConnection::accepts(locator) {
        return Ok(Box::new(SqliteConnection::open(locator)?));
    }
    Err(Error::Connection(format!(
        "no driver available for locator `{locator}`"
    )))
}

/// Run `f` against the connection `target` resolves to.
pub(crate) fn with_connection<T>(
    target: Target<'_>,
    f: impl FnOnce(&mut dyn Connection) -> Result<T>,
) -> Result<T> {
    match target {
        Target::Open(connection) => f(connection),
        Target::Locator(locator) => {
            let mut connection = open(&locator)?;
            f(connection.as_mut())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_param_style() {
        assert_eq!(ParamStyle::Question.placeholder(3), "?");
        assert_eq!(ParamStyle::Dollar.placeholder(0), "$1");
        assert_eq!(ParamStyle::Colon.placeholder(1), ":2");
        assert_eq!(ParamStyle::Percent.placeholder(7), "%s");
    }

    #[test]
    fn unknown_scheme_is_a_connection_error() {
        let err = open("postgresql://localhost/db")
            .err()
            .expect("no postgres driver is bundled");
        assert!(matches!(err, Error::Connection(_)));
    }
}
