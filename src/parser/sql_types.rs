use sqlparser::ast::DataType;
use sqlparser::parser::Parser;

use crate::dialect::Dialect;

/// Parse a declared SQL column type (`VARCHAR(10)`, `DOUBLE PRECISION`, ...) into
/// the `sqlparser` type AST.
///
/// Returns `None` when the text is not a type `sqlparser` understands, e.g. the
/// free-form type names SQLite accepts.
pub fn parse_type_name(type_name: &str, dialect: Dialect) -> Option<DataType> {
    let parser_dialect = dialect.parser_dialect();
    Parser::new(parser_dialect.as_ref())
        .try_with_sql(type_name)
        .ok()?
        .parse_data_type()
        .ok()
}

/// Uppercased type name without its parameter list: `varchar(10)` -> `VARCHAR`.
pub fn base_type_name(type_name: &str) -> String {
    let head = type_name.split('(').next().unwrap_or_default();
    head.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Uppercased type name with whitespace collapsed and parameters kept:
/// `tinyint( 1 )` -> `TINYINT(1)`.
pub fn canonical_type_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut pending_space = false;
    for ch in type_name.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !matches!(ch, '(' | ')' | ',') && !out.ends_with(['(', ',']) {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch.to_ascii_uppercase());
    }
    out
}
