use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use tracing::warn;

use crate::connection::{ResultColumn, ResultSet, SqlValue};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::table::{Column, ColumnType, Row, Table, Value};
use crate::types::to_column_type;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Build a table from a result set, inferring column types from the cursor.
pub(crate) fn materialize(result: ResultSet, dialect: Dialect) -> Result<Table> {
    let names = unique_names(&result.columns);
    let columns = result
        .columns
        .iter()
        .zip(names)
        .enumerate()
        .map(|(index, (column, name))| {
            let column_type = infer_column_type(column, index, &result.rows, dialect)
                .map_err(|e| e.with_column(&name))?;
            Ok(Column::new(name, column_type))
        })
        .collect::<Result<Vec<_>>>()?;
    decode_rows(columns, result.rows)
}

/// Build a table from a result set whose column types are already known.
pub(crate) fn materialize_as(result: ResultSet, columns: Vec<Column>) -> Result<Table> {
    if result.columns.len() != columns.len() {
        return Err(Error::InvalidTable(format!(
            "result has {} columns but {} were expected",
            result.columns.len(),
            columns.len()
        )));
    }
    decode_rows(columns, result.rows)
}

fn unique_names(columns: &[ResultColumn]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(columns.len());
    columns
        .iter()
        .map(|column| {
            let mut name = column.name.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{}_{suffix}", column.name);
                suffix += 1;
            }
            if name != column.name {
                warn!(original = %column.name, renamed = %name, "duplicate result column renamed");
            }
            name
        })
        .collect()
}

fn infer_column_type(
    column: &ResultColumn,
    index: usize,
    rows: &[Vec<SqlValue>],
    dialect: Dialect,
) -> Result<ColumnType> {
    if let Some(decl_type) = column.decl_type.as_deref().filter(|t| !t.trim().is_empty()) {
        return to_column_type(decl_type, dialect);
    }

    let mut inferred = None;
    for value in rows.iter().filter_map(|row| row.get(index)) {
        match value {
            SqlValue::Null => {}
            SqlValue::Integer(_) | SqlValue::Real(_) => {
                inferred.get_or_insert(ColumnType::Number);
            }
            SqlValue::Text(_) => inferred = Some(ColumnType::Text),
            SqlValue::Blob(_) => {
                return Err(Error::UnsupportedType {
                    column: None,
                    type_name: "BLOB".to_string(),
                })
            }
        }
    }
    Ok(inferred.unwrap_or(ColumnType::Text))
}

fn decode_rows(columns: Vec<Column>, raw_rows: Vec<Vec<SqlValue>>) -> Result<Table> {
    let rows = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .zip(&columns)
                .map(|(value, column)| {
                    decode(value, column.column_type)
                        .map_err(|message| Error::invalid_value(&column.name, message))
                })
                .collect::<Result<Row>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Table::from_columns(columns, rows)
}

fn decode(value: SqlValue, column_type: ColumnType) -> std::result::Result<Value, String> {
    if value == SqlValue::Null {
        return Ok(Value::Null);
    }
    match column_type {
        ColumnType::Boolean => decode_boolean(&value).map(Value::Boolean),
        ColumnType::Number => decode_number(&value).map(Value::Number),
        ColumnType::Date => decode_date(&value).map(Value::Date),
        ColumnType::DateTime => decode_datetime(&value).map(Value::DateTime),
        ColumnType::TimeInterval => decode_interval(&value).map(Value::TimeInterval),
        ColumnType::Text => match value {
            SqlValue::Text(s) => Ok(Value::Text(s)),
            SqlValue::Integer(i) => Ok(Value::Text(i.to_string())),
            SqlValue::Real(f) => Ok(Value::Text(f.to_string())),
            other => Err(format!("cannot read {other:?} as text")),
        },
    }
}

fn decode_boolean(value: &SqlValue) -> std::result::Result<bool, String> {
    match value {
        SqlValue::Integer(i) => Ok(*i != 0),
        SqlValue::Real(f) => Ok(*f != 0.0),
        SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "0" => Ok(false),
            _ => Err(format!("`{s}` is not a boolean")),
        },
        other => Err(format!("cannot read {other:?} as a boolean")),
    }
}

fn decode_number(value: &SqlValue) -> std::result::Result<Decimal, String> {
    match value {
        SqlValue::Integer(i) => Ok(Decimal::from(*i)),
        // Shortest round-trip text keeps 1.1 as 1.1 instead of its binary expansion.
        SqlValue::Real(f) if f.is_finite() => {
            parse_decimal(&f.to_string()).or_else(|_| parse_decimal(&format!("{f:e}")))
        }
        SqlValue::Text(s) => parse_decimal(s.trim()),
        other => Err(format!("cannot read {other:?} as a number")),
    }
}

fn parse_decimal(text: &str) -> std::result::Result<Decimal, String> {
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| format!("`{text}` is not a decimal number"))
}

fn decode_date(value: &SqlValue) -> std::result::Result<NaiveDate, String> {
    match value {
        SqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .or_else(|| parse_datetime(s).map(|dt| dt.date()))
            .ok_or_else(|| format!("`{s}` is not a date")),
        other => Err(format!("cannot read {other:?} as a date")),
    }
}

fn decode_datetime(value: &SqlValue) -> std::result::Result<NaiveDateTime, String> {
    match value {
        SqlValue::Text(s) => parse_datetime(s)
            .or_else(|| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok_or_else(|| format!("`{s}` is not a date-time")),
        other => Err(format!("cannot read {other:?} as a date-time")),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn decode_interval(value: &SqlValue) -> std::result::Result<TimeDelta, String> {
    match value {
        SqlValue::Integer(micros) => Ok(TimeDelta::microseconds(*micros)),
        SqlValue::Real(micros) if micros.is_finite() => {
            Ok(TimeDelta::microseconds(micros.round() as i64))
        }
        SqlValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(TimeDelta::microseconds)
            .map_err(|_| format!("`{s}` is not an interval in microseconds")),
        other => Err(format!("cannot read {other:?} as an interval")),
    }
}
