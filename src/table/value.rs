use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Logical type of a tabular column, independent of any SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// `true` / `false`.
    Boolean,
    /// Exact decimal number.
    Number,
    /// Calendar date without time.
    Date,
    /// Date and time of day without a time zone.
    DateTime,
    /// Signed duration.
    TimeInterval,
    /// UTF-8 text.
    Text,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Boolean,
        ColumnType::Number,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::TimeInterval,
        ColumnType::Text,
    ];
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "Boolean",
            ColumnType::Number => "Number",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "DateTime",
            ColumnType::TimeInterval => "TimeInterval",
            ColumnType::Text => "Text",
        };
        f.write_str(name)
    }
}

/// A single cell of a [`Table`](super::Table).
///
/// Any column may hold [`Value::Null`] regardless of its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// A boolean value.
    Boolean(bool),
    /// An exact decimal number.
    Number(Decimal),
    /// A calendar date.
    Date(NaiveDate),
    /// A naive date and time.
    DateTime(NaiveDateTime),
    /// A signed duration.
    TimeInterval(TimeDelta),
    /// A text value.
    Text(String),
}

impl Value {
    /// Returns `true` if the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the column type this value belongs to, or `None` for [`Value::Null`].
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ColumnType::Boolean),
            Self::Number(_) => Some(ColumnType::Number),
            Self::Date(_) => Some(ColumnType::Date),
            Self::DateTime(_) => Some(ColumnType::DateTime),
            Self::TimeInterval(_) => Some(ColumnType::TimeInterval),
            Self::Text(_) => Some(ColumnType::Text),
        }
    }

    /// Returns the inner string slice if this is a [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner decimal if this is a [`Value::Number`].
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the inner boolean if this is a [`Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Self::TimeInterval(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(d) => write!(f, "{d}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::TimeInterval(delta) => write!(f, "{delta}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// Numbers serialize as strings so they survive JSON without losing precision.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Text(s) => serializer.serialize_str(s),
            other => serializer.collect_str(other),
        }
    }
}
