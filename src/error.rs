//! Error type shared by every operation in the crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by schema generation, introspection, writes and queries.
///
/// Nothing is retried or recovered locally; errors carry the offending column or
/// type name where one is known.
#[derive(Debug, Error)]
pub enum Error {
    /// A SQL column type has no tabular counterpart.
    #[error("unsupported SQL column type `{type_name}`{}", for_column(.column))]
    UnsupportedType {
        /// Column that declared the type, when known.
        column: Option<String>,
        /// The SQL type name as declared or reported by the driver.
        type_name: String,
    },

    /// The database rejected a write because of a uniqueness or not-null constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A connection locator could not be turned into a live connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// Any other failure reported by the database driver.
    #[error("database error: {0}")]
    Database(String),

    /// The SQL text could not be tokenized or parsed.
    #[error("SQL syntax error: {0}")]
    SqlSyntax(String),

    /// A tabular table violates its structural invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    /// A cell could not be converted between its SQL and tabular representations.
    #[error("invalid value in column `{column}`: {message}")]
    InvalidValue {
        /// Column holding the value.
        column: String,
        /// Why the conversion failed.
        message: String,
    },

    /// An option referenced a column the table does not have.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// A dialect name did not match any known dialect.
    #[error("unknown SQL dialect `{0}`")]
    UnknownDialect(String),

    /// An option value is outside its accepted range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The requested table does not exist in the target database.
    #[error("table `{0}` does not exist")]
    TableNotFound(String),

    /// A query script contained no executable statement.
    #[error("query contains no SQL statements")]
    EmptyQuery,
}

impl Error {
    /// Creates an unsupported-type error for a named column.
    #[must_use]
    pub fn unsupported_column(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            column: Some(column.into()),
            type_name: type_name.into(),
        }
    }

    /// Creates an invalid-value error for a named column.
    #[must_use]
    pub fn invalid_value(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Attaches a column name to an unsupported-type error that lacks one.
    #[must_use]
    pub(crate) fn with_column(self, name: &str) -> Self {
        match self {
            Self::UnsupportedType {
                column: None,
                type_name,
            } => Self::UnsupportedType {
                column: Some(name.to_string()),
                type_name,
            },
            other => other,
        }
    }
}

fn for_column(column: &Option<String>) -> String {
    column
        .as_ref()
        .map(|c| format!(" for column `{c}`"))
        .unwrap_or_default()
}

impl From<sqlparser::tokenizer::TokenizerError> for Error {
    fn from(error: sqlparser::tokenizer::TokenizerError) -> Self {
        Self::SqlSyntax(error.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for Error {
    fn from(error: sqlparser::parser::ParserError) -> Self {
        Self::SqlSyntax(error.to_string())
    }
}
