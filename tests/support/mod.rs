#![allow(dead_code)]

use std::collections::HashSet;

use agate_sql::connection::{ColumnDescription, ParamStyle, ResultColumn, ResultSet, SqlValue};
use agate_sql::{Connection, Dialect, Error, Result, Row, SqliteConnection, Table, Value};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub(crate) fn number(literal: &str) -> Value {
    Value::Number(literal.parse::<Decimal>().expect("decimal literal should parse"))
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

pub(crate) fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d)
        .and_hms_opt(h, min, 0)
        .expect("valid time of day")
}

pub(crate) const SAMPLE_COLUMNS: [&str; 5] = ["number", "textcol", "boolean", "date", "datetime"];

/// Five columns, one of each common type; the last row is all nulls except the text.
pub(crate) fn sample_table() -> Table {
    use agate_sql::ColumnType::*;

    Table::new(
        SAMPLE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        vec![Number, Text, Boolean, Date, DateTime],
        vec![
            vec![
                number("1.123"),
                "a".into(),
                true.into(),
                date(2015, 11, 4).into(),
                datetime(2015, 11, 4, 12, 22).into(),
            ],
            vec![
                number("2"),
                "👍".into(),
                false.into(),
                date(2015, 11, 5).into(),
                datetime(2015, 11, 4, 12, 45).into(),
            ],
            vec![
                number("2"),
                "c".into(),
                false.into(),
                date(2015, 11, 5).into(),
                datetime(2015, 11, 4, 12, 45).into(),
            ],
            vec![Value::Null, "b".into(), Value::Null, Value::Null, Value::Null],
        ],
    )
    .expect("sample table should be valid")
}

pub(crate) fn id_name_table(rows: &[(i64, &str)]) -> Table {
    Table::new(
        vec!["id".into(), "name".into()],
        vec![agate_sql::ColumnType::Number, agate_sql::ColumnType::Text],
        rows.iter()
            .map(|(id, name)| vec![Value::from(*id), Value::from(*name)])
            .collect(),
    )
    .expect("id/name table should be valid")
}

pub(crate) fn memory_connection() -> SqliteConnection {
    SqliteConnection::open_in_memory().expect("in-memory sqlite should open")
}

/// A connection that records what it is asked to do instead of talking to a database.
pub(crate) struct RecordingConnection {
    pub(crate) dialect: Dialect,
    pub(crate) param_style: Option<ParamStyle>,
    pub(crate) existing: HashSet<String>,
    pub(crate) executed: Vec<String>,
    pub(crate) batches: Vec<(String, Vec<Row>)>,
    pub(crate) queries: Vec<String>,
    pub(crate) fail_on_batch: Option<usize>,
}

impl RecordingConnection {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            param_style: None,
            existing: HashSet::new(),
            executed: Vec::new(),
            batches: Vec::new(),
            queries: Vec::new(),
            fail_on_batch: None,
        }
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.iter().map(|(_, rows)| rows.len()).collect()
    }
}

impl Connection for RecordingConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn param_style(&self) -> ParamStyle {
        self.param_style
            .unwrap_or(self.dialect.capabilities().param_style)
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        self.executed.push(sql.to_string());
        Ok(0)
    }

    fn table_exists(&mut self, _schema: Option<&str>, table: &str) -> Result<bool> {
        Ok(self.existing.contains(table))
    }

    fn describe_table(
        &mut self,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ColumnDescription>> {
        Err(Error::TableNotFound(table.to_string()))
    }

    fn insert_batch(&mut self, statement: &str, rows: &[Row]) -> Result<u64> {
        if self.fail_on_batch == Some(self.batches.len()) {
            return Err(Error::ConstraintViolation("UNIQUE constraint failed".into()));
        }
        self.batches.push((statement.to_string(), rows.to_vec()));
        Ok(rows.len() as u64)
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet> {
        self.queries.push(sql.to_string());
        Ok(ResultSet {
            columns: vec![ResultColumn {
                name: "one".to_string(),
                decl_type: None,
            }],
            rows: vec![vec![SqlValue::Integer(1)]],
        })
    }
}
