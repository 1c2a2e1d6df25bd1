//! Turning observed pivot values into SQL tests and column-name fragments.

use std::sync::LazyLock;

use regex::Regex;

use crate::sql::dialect::Dialect;
use crate::sql::token::{Token, TokenStream};
use crate::value::Value;

static UNSAFE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Replace every run of characters outside `[0-9A-Za-z_]` with one `_`.
///
/// Distinct inputs can map to the same output (`A-B` and `A_B`); callers that
/// need unique names must check for collisions.
pub fn sanitize(text: &str) -> String {
    UNSAFE_RUN.replace_all(text, "_").into_owned()
}

/// Render `column` tested against one observed value.
///
/// Returns the test (`month = '2023-01'`, `month IS NULL`) and the name
/// fragment used in output aliases (`month_2023_01`, `month_null`). Numbers
/// are unquoted; text is quoted for the dialect, so embedded quotes are
/// escaped. The column name is emitted as given.
pub fn predicate(column: &str, value: &Value, dialect: Dialect) -> (String, String) {
    let mut ts = TokenStream::new();
    ts.push(Token::Bare(column.to_string())).space();

    let literal = match value {
        Value::Null => {
            ts.push(Token::IsNull);
            return (ts.serialize(dialect), format!("{column}_null"));
        }
        Value::Int(n) => Token::LitInt(*n),
        Value::Float(x) => Token::LitFloat(*x),
        Value::Text(s) => Token::LitString(s.clone()),
    };
    ts.push(Token::Eq).space().push(literal);

    (
        ts.serialize(dialect),
        format!("{column}_{}", sanitize(&value.to_string())),
    )
}
