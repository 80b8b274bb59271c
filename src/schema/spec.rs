use std::fmt;

use crate::connection::ParamStyle;
use crate::dialect::Dialect;
use crate::parser::names::{qualified_name, quote_identifier};
use crate::types::SqlType;

/// A column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumnSpec {
    /// Column name.
    pub name: String,
    /// SQL type with any length or precision parameters.
    pub sql_type: SqlType,
    /// Whether the column accepts nulls.
    pub nullable: bool,
}

/// A SQL table definition, built fresh for each write, read or DDL request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTableSpec {
    /// Table name.
    pub name: String,
    /// Schema the table lives in, if qualified.
    pub schema: Option<String>,
    /// Columns in order.
    pub columns: Vec<SqlColumnSpec>,
    /// Columns of a single UNIQUE constraint, in order.
    pub unique: Option<Vec<String>>,
    /// Keywords placed between `CREATE` and `TABLE`.
    pub prefixes: Vec<String>,
    /// Dialect the definition is rendered for.
    pub dialect: Dialect,
}

impl SqlTableSpec {
    /// The table name, schema-qualified and quoted for the dialect.
    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema.as_deref(), &self.name, self.dialect)
    }

    fn quoted_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| quote_identifier(&column.name, self.dialect))
            .collect()
    }

    /// `CREATE TABLE` statement, terminated with `;`.
    pub fn create_statement(&self, if_not_exists: bool) -> String {
        let caps = self.dialect.capabilities();
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let null_marker = if !column.nullable {
                    " NOT NULL"
                } else if caps.explicit_null_datetime && column.sql_type == SqlType::Timestamp {
                    " NULL"
                } else {
                    ""
                };
                format!(
                    "{} {}{null_marker}",
                    quote_identifier(&column.name, self.dialect),
                    column.sql_type.render(self.dialect)
                )
            })
            .collect();

        if let Some(unique) = &self.unique {
            let columns: Vec<String> = unique
                .iter()
                .map(|name| quote_identifier(name, self.dialect))
                .collect();
            lines.push(format!("UNIQUE ({})", columns.join(", ")));
        }

        let prefixes: String = self.prefixes.iter().map(|p| format!("{p} ")).collect();
        let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
        let body: Vec<String> = lines.into_iter().map(|line| format!("\t{line}")).collect();
        format!(
            "CREATE {prefixes}TABLE {guard}{} (\n{}\n);",
            self.qualified_name(),
            body.join(",\n")
        )
    }

    /// `DROP TABLE` statement.
    pub fn drop_statement(&self, if_exists: bool) -> String {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        format!("DROP TABLE {guard}{}", self.qualified_name())
    }

    /// Parameterized `INSERT` of one row.
    ///
    /// `prefixes` go between `INSERT` and `INTO`, e.g. `OR REPLACE`.
    pub fn insert_statement(&self, prefixes: &[String], style: ParamStyle) -> String {
        let prefixes: String = prefixes.iter().map(|p| format!("{p} ")).collect();
        let placeholders: Vec<String> = (0..self.columns.len())
            .map(|i| style.placeholder(i))
            .collect();
        format!(
            "INSERT {prefixes}INTO {} ({}) VALUES ({})",
            self.qualified_name(),
            self.quoted_columns().join(", "),
            placeholders.join(", ")
        )
    }

    /// `SELECT` of every column in storage order, optionally limited.
    pub fn select_statement(&self, row_limit: Option<u64>) -> String {
        let columns = self.quoted_columns().join(", ");
        let table = self.qualified_name();
        match (row_limit, self.dialect) {
            (None, _) => format!("SELECT {columns} FROM {table}"),
            (Some(n), Dialect::Mssql) => format!("SELECT TOP {n} {columns} FROM {table}"),
            (Some(n), Dialect::Oracle) => {
                format!("SELECT {columns} FROM {table} FETCH FIRST {n} ROWS ONLY")
            }
            (Some(n), _) => format!("SELECT {columns} FROM {table} LIMIT {n}"),
        }
    }
}

impl fmt::Display for SqlTableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.create_statement(false))
    }
}
