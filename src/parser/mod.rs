/// Identifier quoting and schema-qualified name helpers.
pub mod names;
/// Parsing of declared SQL column types through `sqlparser`.
pub mod sql_types;
/// Statement splitting for multi-statement scripts and placeholder escaping.
pub mod statements;
