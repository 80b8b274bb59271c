use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{params_from_iter, OptionalExtension};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, trace};

use super::{ColumnDescription, Connection, ResultColumn, ResultSet, SqlValue};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::parser::names::quote_identifier;
use crate::table::{Row, Value};

const MEMORY: &str = ":memory:";

/// A SQLite database opened through the bundled `rusqlite` driver.
#[derive(Debug)]
pub struct SqliteConnection {
    inner: rusqlite::Connection,
}

impl SqliteConnection {
    /// Whether `locator` names a SQLite database.
    pub fn accepts(locator: &str) -> bool {
        locator == MEMORY || locator.starts_with("sqlite:")
    }

    /// Open the database a `sqlite:` locator points at.
    ///
    /// `sqlite://`, `sqlite:///:memory:`, `sqlite::memory:` and `:memory:` open a
    /// private in-memory database. `sqlite:///relative.db`, `sqlite:////absolute.db`
    /// and `sqlite:relative.db` open (or create) a file.
    pub fn open(locator: &str) -> Result<Self> {
        let path = database_path(locator)?;
        debug!(%locator, "opening sqlite database");
        let inner = if path == MEMORY {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(path)
        }
        .map_err(|e| Error::Connection(format!("cannot open `{locator}`: {e}")))?;
        Ok(Self::from_rusqlite(inner))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let inner = rusqlite::Connection::open_in_memory()
            .map_err(|e| Error::Connection(format!("cannot open in-memory database: {e}")))?;
        Ok(Self::from_rusqlite(inner))
    }

    /// Wrap a connection the caller already opened.
    pub fn from_rusqlite(inner: rusqlite::Connection) -> Self {
        Self { inner }
    }

    /// The underlying `rusqlite` connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.inner
    }
}

fn database_path(locator: &str) -> Result<&str> {
    if locator == MEMORY {
        return Ok(MEMORY);
    }
    let rest = locator.strip_prefix("sqlite:").ok_or_else(|| {
        Error::Connection(format!("`{locator}` is not a sqlite locator"))
    })?;
    let path = match rest.strip_prefix("//") {
        // sqlite:/// + path; a fourth slash makes the path absolute.
        Some(authority_and_path) => match authority_and_path.strip_prefix('/') {
            Some(path) => path,
            None if authority_and_path.is_empty() => MEMORY,
            None => {
                return Err(Error::Connection(format!(
                    "`{locator}` names a host; sqlite locators take a path"
                )))
            }
        },
        None => rest,
    };
    Ok(if path.is_empty() || path == MEMORY {
        MEMORY
    } else {
        path
    })
}

fn encode(value: &Value, position: usize) -> Result<SqliteValue> {
    let encoded = match value {
        Value::Null => SqliteValue::Null,
        Value::Boolean(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Number(d) => match d.normalize() {
            n if n.scale() == 0 => n
                .to_i64()
                .map_or_else(|| SqliteValue::Text(n.to_string()), SqliteValue::Integer),
            n => SqliteValue::Text(n.to_string()),
        },
        Value::Date(d) => SqliteValue::Text(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => SqliteValue::Text(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        Value::TimeInterval(delta) => {
            SqliteValue::Integer(delta.num_microseconds().ok_or_else(|| {
                Error::invalid_value(
                    format!("parameter {}", position + 1),
                    format!("interval {delta} does not fit in microseconds"),
                )
            })?)
        }
        Value::Text(s) => SqliteValue::Text(s.clone()),
    };
    Ok(encoded)
}

fn decode(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Real(f),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}

impl Connection for SqliteConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        trace!(%sql, "execute");
        let affected = self.inner.execute(sql, [])?;
        Ok(affected as u64)
    }

    fn table_exists(&mut self, schema: Option<&str>, table: &str) -> Result<bool> {
        let catalog = quote_identifier(schema.unwrap_or("main"), Dialect::Sqlite);
        let sql = format!(
            "SELECT 1 FROM {catalog}.sqlite_master WHERE type IN ('table', 'view') AND name = ?1"
        );
        let found = self
            .inner
            .query_row(&sql, [table], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn describe_table(
        &mut self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ColumnDescription>> {
        let mut stmt = self.inner.prepare(
            "SELECT name, type, \"notnull\" FROM pragma_table_info(?1, ?2) ORDER BY cid",
        )?;
        let columns = stmt
            .query_map([table, schema.unwrap_or("main")], |row| {
                Ok(ColumnDescription {
                    name: row.get(0)?,
                    type_name: row.get(1)?,
                    native_interval: false,
                    nullable: !row.get::<_, bool>(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if columns.is_empty() {
            let qualified = match schema {
                Some(schema) => format!("{schema}.{table}"),
                None => table.to_string(),
            };
            return Err(Error::TableNotFound(qualified));
        }
        Ok(columns)
    }

    fn insert_batch(&mut self, statement: &str, rows: &[Row]) -> Result<u64> {
        trace!(%statement, rows = rows.len(), "insert batch");
        let tx = self.inner.transaction()?;
        let mut inserted = 0u64;
        {
            let mut stmt = tx.prepare_cached(statement)?;
            for row in rows {
                let params = row
                    .iter()
                    .enumerate()
                    .map(|(position, value)| encode(value, position))
                    .collect::<Result<Vec<_>>>()?;
                inserted += stmt.execute(params_from_iter(params))? as u64;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet> {
        trace!(%sql, "query");
        let mut stmt = self.inner.prepare(sql)?;
        let columns: Vec<ResultColumn> = stmt
            .columns()
            .iter()
            .map(|column| ResultColumn {
                name: column.name().to_string(),
                decl_type: column.decl_type().map(str::to_string),
            })
            .collect();

        let width = columns.len();
        let mut cursor = stmt.query([])?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next()? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(decode))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.push(values);
        }
        Ok(ResultSet { columns, rows })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                Error::ConstraintViolation(error.to_string())
            }
            _ => Error::Database(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use rust_decimal::Decimal;

    #[test]
    fn locators_resolve_to_paths() {
        for memory in ["sqlite://", "sqlite:///:memory:", "sqlite::memory:", ":memory:"] {
            assert_eq!(database_path(memory).ok(), Some(MEMORY), "{memory}");
        }
        assert_eq!(database_path("sqlite:///data/x.db").ok(), Some("data/x.db"));
        assert_eq!(database_path("sqlite:////tmp/x.db").ok(), Some("/tmp/x.db"));
        assert_eq!(database_path("sqlite:x.db").ok(), Some("x.db"));
        assert!(matches!(
            database_path("sqlite://host/x.db"),
            Err(Error::Connection(_))
        ));
        assert!(matches!(
            database_path("postgres://x"),
            Err(Error::Connection(_))
        ));
    }

    #[test]
    fn values_encode_to_sqlite_storage_classes() {
        let encoded = |value: Value| encode(&value, 0).expect("value encodes");
        assert_eq!(encoded(true.into()), SqliteValue::Integer(1));
        assert_eq!(
            encoded(Value::Number(Decimal::new(2000, 3))),
            SqliteValue::Integer(2)
        );
        assert_eq!(
            encoded(Value::Number(Decimal::new(1123, 3))),
            SqliteValue::Text("1.123".to_string())
        );
        assert_eq!(
            encoded(NaiveDate::from_ymd_opt(2015, 11, 4).expect("valid date").into()),
            SqliteValue::Text("2015-11-04".to_string())
        );
        assert_eq!(
            encoded(TimeDelta::milliseconds(1500).into()),
            SqliteValue::Integer(1_500_000)
        );
    }

    #[test]
    fn missing_table_is_reported() {
        let mut conn = SqliteConnection::open_in_memory().expect("in-memory database");
        assert!(!conn.table_exists(None, "nope").expect("lookup succeeds"));
        assert!(matches!(
            conn.describe_table(None, "nope"),
            Err(Error::TableNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn query_reports_declared_types() {
        let mut conn = SqliteConnection::open_in_memory().expect("in-memory database");
        conn.execute("CREATE TABLE t (a DECIMAL, b VARCHAR(3))")
            .expect("create succeeds");
        conn.execute("INSERT INTO t VALUES (1.5, 'x')")
            .expect("insert succeeds");

        let result = conn.query("SELECT a, b, 1 + 1 AS c FROM t").expect("query runs");
        let decl: Vec<Option<&str>> = result
            .columns
            .iter()
            .map(|c| c.decl_type.as_deref())
            .collect();
        assert_eq!(decl, vec![Some("DECIMAL"), Some("VARCHAR(3)"), None]);
        assert_eq!(
            result.rows,
            vec![vec![
                SqlValue::Real(1.5),
                SqlValue::Text("x".to_string()),
                SqlValue::Integer(2)
            ]]
        );
    }
}
