//! SQL dialects and the static capability table that drives type selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};

use crate::connection::ParamStyle;
use crate::error::Error;

/// A relational database product whose SQL variant affects type names and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// No particular product; portable type names.
    #[default]
    Generic,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgresql,
    /// MySQL and MariaDB.
    Mysql,
    /// Oracle Database.
    Oracle,
    /// Microsoft SQL Server.
    Mssql,
    /// CrateDB.
    Crate,
    /// Actian Ingres.
    Ingres,
}

/// What a dialect supports and how it spells the types this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Type used for boolean columns.
    pub boolean_type: &'static str,
    /// Type used for date-time columns.
    pub datetime_type: &'static str,
    /// The dialect's own interval type, if it has one.
    pub native_interval: Option<&'static str>,
    /// Type used for intervals when there is no native interval type.
    pub generic_interval: &'static str,
    /// Bounded character type.
    pub varchar_type: &'static str,
    /// Unbounded text type.
    pub unbounded_text: &'static str,
    /// Largest length the bounded character type accepts.
    pub max_varchar_length: Option<u64>,
    /// Whether the bounded character type must always carry a length.
    pub varchar_requires_length: bool,
    /// Fixed decimal precision used when constraints are generated.
    pub decimal_precision: Option<u32>,
    /// Whether nullable date-time columns must say `NULL` explicitly.
    pub explicit_null_datetime: bool,
    /// Whether `CREATE TABLE IF NOT EXISTS` is accepted.
    pub supports_if_not_exists: bool,
    /// Whether `DROP TABLE IF EXISTS` is accepted.
    pub supports_if_exists: bool,
    /// Opening and closing identifier quote characters.
    pub identifier_quotes: (char, char),
    /// Placeholder style drivers for this dialect expect.
    pub param_style: ParamStyle,
}

const GENERIC: Capabilities = Capabilities {
    boolean_type: "BOOLEAN",
    datetime_type: "TIMESTAMP",
    native_interval: None,
    generic_interval: "INTERVAL",
    varchar_type: "VARCHAR",
    unbounded_text: "TEXT",
    max_varchar_length: None,
    varchar_requires_length: false,
    decimal_precision: None,
    explicit_null_datetime: false,
    supports_if_not_exists: true,
    supports_if_exists: true,
    identifier_quotes: ('"', '"'),
    param_style: ParamStyle::Question,
};

const POSTGRESQL: Capabilities = Capabilities {
    native_interval: Some("INTERVAL"),
    max_varchar_length: Some(10_485_760),
    param_style: ParamStyle::Dollar,
    ..GENERIC
};

// utf8mb3 rows are capped at 65,535 bytes, so 21,844 three-byte characters.
const MYSQL: Capabilities = Capabilities {
    boolean_type: "BOOL",
    generic_interval: "BIGINT",
    max_varchar_length: Some(21_844),
    varchar_requires_length: true,
    decimal_precision: Some(38),
    explicit_null_datetime: true,
    identifier_quotes: ('`', '`'),
    ..GENERIC
};

const ORACLE: Capabilities = Capabilities {
    boolean_type: "SMALLINT",
    native_interval: Some("INTERVAL DAY TO SECOND"),
    varchar_type: "VARCHAR2",
    unbounded_text: "CLOB",
    max_varchar_length: Some(4_000),
    varchar_requires_length: true,
    decimal_precision: Some(38),
    supports_if_not_exists: false,
    supports_if_exists: false,
    param_style: ParamStyle::Colon,
    ..GENERIC
};

const MSSQL: Capabilities = Capabilities {
    boolean_type: "BIT",
    datetime_type: "DATETIME2",
    generic_interval: "BIGINT",
    unbounded_text: "VARCHAR(MAX)",
    max_varchar_length: Some(8_000),
    decimal_precision: Some(38),
    supports_if_not_exists: false,
    supports_if_exists: false,
    identifier_quotes: ('[', ']'),
    ..GENERIC
};

const INGRES: Capabilities = Capabilities {
    decimal_precision: Some(38),
    ..GENERIC
};

impl Dialect {
    /// Every known dialect.
    pub const ALL: [Dialect; 8] = [
        Dialect::Generic,
        Dialect::Sqlite,
        Dialect::Postgresql,
        Dialect::Mysql,
        Dialect::Oracle,
        Dialect::Mssql,
        Dialect::Crate,
        Dialect::Ingres,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Sqlite => "sqlite",
            Dialect::Postgresql => "postgresql",
            Dialect::Mysql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::Mssql => "mssql",
            Dialect::Crate => "crate",
            Dialect::Ingres => "ingres",
        }
    }

    /// Static capability record for this dialect.
    pub fn capabilities(self) -> &'static Capabilities {
        match self {
            Dialect::Generic | Dialect::Sqlite | Dialect::Crate => &GENERIC,
            Dialect::Postgresql => &POSTGRESQL,
            Dialect::Mysql => &MYSQL,
            Dialect::Oracle => &ORACLE,
            Dialect::Mssql => &MSSQL,
            Dialect::Ingres => &INGRES,
        }
    }

    /// The `sqlparser` dialect used to tokenize and parse SQL text for this dialect.
    pub fn parser_dialect(self) -> Box<dyn sqlparser::dialect::Dialect> {
        match self {
            Dialect::Sqlite => Box::new(SQLiteDialect {}),
            Dialect::Postgresql | Dialect::Crate => Box::new(PostgreSqlDialect {}),
            Dialect::Mysql => Box::new(MySqlDialect {}),
            Dialect::Mssql => Box::new(MsSqlDialect {}),
            Dialect::Generic | Dialect::Oracle | Dialect::Ingres => Box::new(GenericDialect {}),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "generic" | "default" => Ok(Dialect::Generic),
            "sqlite" => Ok(Dialect::Sqlite),
            "postgresql" | "postgres" => Ok(Dialect::Postgresql),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "oracle" => Ok(Dialect::Oracle),
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            "crate" => Ok(Dialect::Crate),
            "ingres" => Ok(Dialect::Ingres),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>().ok(), Some(dialect));
        }
        assert_eq!("Postgres".parse::<Dialect>().ok(), Some(Dialect::Postgresql));
    }

    #[test]
    fn unknown_dialect_is_an_error() {
        let err = "dbase".parse::<Dialect>().expect_err("unknown dialect");
        assert!(matches!(err, Error::UnknownDialect(name) if name == "dbase"));
    }

    #[test]
    fn only_postgresql_and_oracle_have_native_intervals() {
        let native: Vec<Dialect> = Dialect::ALL
            .into_iter()
            .filter(|d| d.capabilities().native_interval.is_some())
            .collect();
        assert_eq!(native, vec![Dialect::Postgresql, Dialect::Oracle]);
    }
}
