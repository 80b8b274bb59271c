use std::borrow::Cow;

use sqlparser::tokenizer::{Token, Tokenizer};

use crate::dialect::Dialect;
use crate::error::Result;

/// Split a script into its statements on `;` separators.
///
/// Tokenizes with the dialect's lexer so separators inside string literals,
/// quoted identifiers and comments are not treated as boundaries. Statements are
/// returned trimmed, in order; fragments holding only whitespace or comments are
/// dropped.
pub fn split_statements(sql: &str, dialect: Dialect) -> Result<Vec<String>> {
    let parser_dialect = dialect.parser_dialect();
    let tokens = Tokenizer::new(parser_dialect.as_ref(), sql)
        .with_unescape(false)
        .tokenize()?;

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_content = false;

    for token in tokens {
        match token {
            Token::SemiColon => {
                flush_statement(&mut statements, &mut current, &mut has_content);
            }
            Token::EOF => {}
            Token::Whitespace(_) => current.push_str(&token.to_string()),
            other => {
                has_content = true;
                current.push_str(&other.to_string());
            }
        }
    }
    flush_statement(&mut statements, &mut current, &mut has_content);

    Ok(statements)
}

fn flush_statement(statements: &mut Vec<String>, current: &mut String, has_content: &mut bool) {
    if *has_content {
        statements.push(current.trim().to_string());
    }
    current.clear();
    *has_content = false;
}

/// Double every `%` so percent-style drivers do not read it as a placeholder.
pub fn escape_percent(sql: &str) -> Cow<'_, str> {
    if sql.contains('%') {
        Cow::Owned(sql.replace('%', "%%"))
    } else {
        Cow::Borrowed(sql)
    }
}
