use std::fmt;

use sqlparser::ast::DataType as AstType;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::parser::sql_types::{base_type_name, canonical_type_name, parse_type_name};
use crate::table::ColumnType;

/// A SQL column type this crate can emit, with its dialect-independent parameters.
///
/// The concrete spelling is chosen per dialect by [`SqlType::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Boolean column.
    Boolean,
    /// Exact numeric column, optionally with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u32>,
        /// Digits after the decimal point.
        scale: Option<u32>,
    },
    /// Calendar date.
    Date,
    /// Date and time of day.
    Timestamp,
    /// The dialect's native interval type.
    Interval,
    /// Generic stand-in for dialects without an interval column type.
    Duration,
    /// Bounded character column; `None` leaves the length to the database.
    Varchar {
        /// Maximum length in characters.
        length: Option<u64>,
    },
    /// Unbounded text column.
    Text,
}

impl SqlType {
    /// Spell the type for `dialect`.
    pub fn render(&self, dialect: Dialect) -> String {
        let caps = dialect.capabilities();
        match self {
            SqlType::Boolean => caps.boolean_type.to_string(),
            SqlType::Decimal {
                precision: Some(precision),
                scale,
            } => format!("DECIMAL({precision}, {})", scale.unwrap_or(0)),
            SqlType::Decimal { .. } => "DECIMAL".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Timestamp => caps.datetime_type.to_string(),
            SqlType::Interval => caps.native_interval.unwrap_or("INTERVAL").to_string(),
            SqlType::Duration => caps.generic_interval.to_string(),
            SqlType::Varchar {
                length: Some(length),
            } => format!("{}({length})", caps.varchar_type),
            SqlType::Varchar { length: None } if caps.varchar_requires_length => {
                caps.unbounded_text.to_string()
            }
            SqlType::Varchar { length: None } => caps.varchar_type.to_string(),
            SqlType::Text => caps.unbounded_text.to_string(),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Dialect::Generic))
    }
}

/// Forward mapping from a tabular column type to its unparameterized SQL type.
///
/// Intervals map to the dialect's native interval type where one exists
/// (PostgreSQL, Oracle) and to the generic duration stand-in elsewhere.
pub fn to_sql_type(column_type: ColumnType, dialect: Dialect) -> SqlType {
    match column_type {
        ColumnType::Boolean => SqlType::Boolean,
        ColumnType::Number => SqlType::Decimal {
            precision: None,
            scale: None,
        },
        ColumnType::Date => SqlType::Date,
        ColumnType::DateTime => SqlType::Timestamp,
        ColumnType::TimeInterval if dialect.capabilities().native_interval.is_some() => {
            SqlType::Interval
        }
        ColumnType::TimeInterval => SqlType::Duration,
        ColumnType::Text => SqlType::Varchar { length: None },
    }
}

/// Reverse mapping from a declared SQL type to the tabular column type that holds it.
///
/// Integer, fixed-point and floating-point types all become [`ColumnType::Number`];
/// floating-point values are read back as exact decimals. Types with no tabular
/// counterpart (binary, JSON, time-of-day, ...) fail with
/// [`Error::UnsupportedType`].
pub fn to_column_type(type_name: &str, dialect: Dialect) -> Result<ColumnType> {
    let canonical = canonical_type_name(type_name);

    // MySQL spells BOOL as TINYINT(1).
    if dialect == Dialect::Mysql && canonical == "TINYINT(1)" {
        return Ok(ColumnType::Boolean);
    }
    if let Some(native) = dialect.capabilities().native_interval {
        if canonical.starts_with(native) {
            return Ok(ColumnType::TimeInterval);
        }
    }

    parse_type_name(type_name, dialect)
        .and_then(|ast| classify_ast(&ast))
        .or_else(|| classify_by_name(&base_type_name(type_name), dialect))
        .ok_or_else(|| Error::UnsupportedType {
            column: None,
            type_name: type_name.to_string(),
        })
}

fn classify_ast(ast: &AstType) -> Option<ColumnType> {
    let column_type = match ast {
        AstType::Bool { .. } | AstType::Boolean { .. } => ColumnType::Boolean,
        AstType::TinyInt { .. }
        | AstType::TinyIntUnsigned { .. }
        | AstType::SmallInt { .. }
        | AstType::SmallIntUnsigned { .. }
        | AstType::MediumInt { .. }
        | AstType::MediumIntUnsigned { .. }
        | AstType::Int { .. }
        | AstType::IntUnsigned { .. }
        | AstType::Integer { .. }
        | AstType::IntegerUnsigned { .. }
        | AstType::UnsignedInteger { .. }
        | AstType::BigInt { .. }
        | AstType::BigIntUnsigned { .. }
        | AstType::Int2 { .. }
        | AstType::Int2Unsigned { .. }
        | AstType::Int4 { .. }
        | AstType::Int4Unsigned { .. }
        | AstType::Int8 { .. }
        | AstType::Int8Unsigned { .. }
        | AstType::Numeric { .. }
        | AstType::Decimal { .. }
        | AstType::Dec { .. }
        | AstType::BigNumeric { .. }
        | AstType::BigDecimal { .. }
        | AstType::Float { .. }
        | AstType::Float4 { .. }
        | AstType::Float8 { .. }
        | AstType::Real { .. }
        | AstType::Double { .. }
        | AstType::DoublePrecision { .. } => ColumnType::Number,
        AstType::Char { .. }
        | AstType::Character { .. }
        | AstType::CharVarying { .. }
        | AstType::CharacterVarying { .. }
        | AstType::Varchar { .. }
        | AstType::Nvarchar { .. }
        | AstType::CharacterLargeObject { .. }
        | AstType::CharLargeObject { .. }
        | AstType::Clob { .. }
        | AstType::String { .. }
        | AstType::Text { .. }
        | AstType::Uuid { .. } => ColumnType::Text,
        AstType::Date { .. } => ColumnType::Date,
        AstType::Datetime { .. } | AstType::Timestamp { .. } => ColumnType::DateTime,
        AstType::Interval { .. } => ColumnType::TimeInterval,
        _ => return None,
    };
    Some(column_type)
}

fn classify_by_name(base: &str, dialect: Dialect) -> Option<ColumnType> {
    let column_type = match base {
        "BIT" if dialect == Dialect::Mssql => ColumnType::Boolean,
        "NUM" | "NUMBER" | "MONEY" | "SMALLMONEY" | "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" | "FLOAT64"
        | "INT64" | "BINARY_FLOAT" | "BINARY_DOUBLE" => ColumnType::Number,
        "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "NTEXT" | "NCHAR" | "VARCHAR2" | "NVARCHAR2"
        | "NCLOB" | "CITEXT" => ColumnType::Text,
        "DATETIME2" | "SMALLDATETIME" | "DATETIMEOFFSET" | "TIMESTAMPTZ" => ColumnType::DateTime,
        _ if dialect == Dialect::Sqlite => return sqlite_affinity(base),
        _ => return None,
    };
    Some(column_type)
}

// SQLite's column-affinity rules, minus the catch-all NUMERIC rule.
fn sqlite_affinity(base: &str) -> Option<ColumnType> {
    let numeric = ["INT", "REAL", "FLOA", "DOUB", "NUMERIC", "DECIMAL"];
    if numeric.iter().any(|k| base.contains(k)) {
        Some(ColumnType::Number)
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|k| base.contains(k)) {
        Some(ColumnType::Text)
    } else {
        None
    }
}
