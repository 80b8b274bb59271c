use sqlparser::keywords::ALL_KEYWORDS;

use crate::dialect::Dialect;

/// True when `ident` is any keyword `sqlparser` knows, in any case.
pub fn is_keyword(ident: &str) -> bool {
    ALL_KEYWORDS
        .binary_search(&ident.to_ascii_uppercase().as_str())
        .is_ok()
}

/// Return the identifier without surrounding double quotes, backticks or brackets.
pub fn unquote_identifier(ident: &str) -> &str {
    for (open, close) in [('"', '"'), ('`', '`'), ('[', ']')] {
        if let Some(inner) = ident
            .strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
        {
            return inner;
        }
    }
    ident
}

/// True when the identifier must be quoted to survive as written.
///
/// Plain lowercase identifiers (`[a-z_][a-z0-9_]*`) that are not SQL keywords
/// are left bare; everything else is quoted so case and punctuation are kept.
pub fn needs_quoting(ident: &str) -> bool {
    let mut chars = ident.chars();
    let plain_start = chars
        .next()
        .is_some_and(|ch| ch.is_ascii_lowercase() || ch == '_');
    let plain_rest = chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
    !(plain_start && plain_rest) || is_keyword(ident)
}

/// Quote an identifier for `dialect` when [`needs_quoting`] says so.
///
/// Embedded closing quote characters are doubled.
pub fn quote_identifier(ident: &str, dialect: Dialect) -> String {
    if !needs_quoting(ident) {
        return ident.to_string();
    }
    let (open, close) = dialect.capabilities().identifier_quotes;
    let escaped = ident.replace(close, &format!("{close}{close}"));
    format!("{open}{escaped}{close}")
}

/// Render `schema.name`, or just `name`, quoting each part as needed.
pub fn qualified_name(schema: Option<&str>, name: &str, dialect: Dialect) -> String {
    match schema {
        Some(schema) => format!(
            "{}.{}",
            quote_identifier(schema, dialect),
            quote_identifier(name, dialect)
        ),
        None => quote_identifier(name, dialect),
    }
}

/// Split a potentially schema-qualified name into `(schema, relation)`.
///
/// Handles dots inside double-quoted identifiers, e.g. `"my.schema"."table.name"`.
/// Unqualified names yield `(None, name)`.
pub fn split_schema_and_relation(name: &str) -> (Option<String>, String) {
    let mut in_quotes = false;
    let mut split_at = None;

    for (idx, ch) in name.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => split_at = Some(idx),
            _ => {}
        }
    }

    match split_at {
        Some(idx) => (
            Some(unquote_identifier(name[..idx].trim()).to_string()),
            unquote_identifier(name[idx + 1..].trim()).to_string(),
        ),
        None => (None, unquote_identifier(name.trim()).to_string()),
    }
}
