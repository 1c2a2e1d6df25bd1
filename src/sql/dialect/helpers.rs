//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};
use super::SqlDialect;
use crate::design::TableDesign;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: every supported dialect
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL), doubling embedded quotes.
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Placeholders
// =============================================================================

/// Numbered dollar placeholder.
/// Used by: Postgres, Redshift
pub fn placeholder_dollar(n: usize) -> String {
    format!("${n}")
}

/// Positional question-mark placeholder.
/// Used by: Snowflake, DuckDB
pub fn placeholder_question(_n: usize) -> String {
    "?".to_string()
}

/// Numbered question-mark placeholder.
/// Used by: SQLite
pub fn placeholder_numbered_question(n: usize) -> String {
    format!("?{n}")
}

// =============================================================================
// Introspection
// =============================================================================

/// Column names and full type spellings (with length/precision) from the
/// Postgres catalog. Unlike `pg_table_def` this does not depend on the
/// session's search_path.
/// Used by: Postgres, Redshift
pub fn columns_query_pg_catalog<D: SqlDialect + ?Sized>(dialect: &D) -> String {
    format!(
        "SELECT a.attname, format_type(a.atttypid, a.atttypmod)\n\
         FROM pg_catalog.pg_attribute a\n\
         JOIN pg_catalog.pg_class c ON c.oid = a.attrelid\n\
         JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace\n\
         WHERE n.nspname = {} AND c.relname = {} AND a.attnum > 0 AND NOT a.attisdropped\n\
         ORDER BY a.attnum",
        dialect.placeholder(1),
        dialect.placeholder(2)
    )
}

/// Standard `information_schema.columns` lookup.
/// Used by: Snowflake, DuckDB
pub fn columns_query_information_schema<D: SqlDialect + ?Sized>(dialect: &D) -> String {
    format!(
        "SELECT column_name, data_type\n\
         FROM information_schema.columns\n\
         WHERE table_schema = {} AND table_name = {}\n\
         ORDER BY ordinal_position",
        dialect.placeholder(1),
        dialect.placeholder(2)
    )
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT n`.
pub fn emit_limit_standard(limit: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Limit)
        .space()
        .push(Token::LitInt(limit.min(i64::MAX as u64) as i64));
    ts
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap aggregates for Snowflake, which spells the boolean aggregates differently.
pub fn remap_function_snowflake(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "BOOL_AND" => Some("BOOLAND_AGG"),
        "BOOL_OR" => Some("BOOLOR_AGG"),
        _ => None,
    }
}

/// Postgres has no single-argument `LISTAGG` (`STRING_AGG` needs a delimiter).
pub fn supports_function_postgres(name: &str) -> bool {
    !name.eq_ignore_ascii_case("LISTAGG")
}

/// Remap aggregates for SQLite. Booleans are stored as 0/1 there, so the
/// boolean aggregates reduce to MIN and MAX.
pub fn remap_function_sqlite(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LISTAGG" => Some("GROUP_CONCAT"),
        "BOOL_AND" => Some("MIN"),
        "BOOL_OR" => Some("MAX"),
        _ => None,
    }
}

// =============================================================================
// Table Options
// =============================================================================

/// Emit `DISTSTYLE`, `DISTKEY` and `SORTKEY` / `COMPOUND SORTKEY` clauses,
/// one per line, in that order.
/// Used by: Redshift
pub fn emit_distribution_clauses(design: &TableDesign) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(style) = design.diststyle {
        ts.newline().push(Token::Raw(format!("DISTSTYLE {style}")));
    }

    if let Some(key) = &design.distkey {
        ts.newline()
            .push(Token::Raw("DISTKEY".into()))
            .lparen()
            .push(Token::Ident(key.clone()))
            .rparen();
    }

    if let Some(sortkey) = &design.sortkey {
        let names = sortkey.names();
        if !names.is_empty() {
            let keyword = if names.len() == 1 {
                "SORTKEY"
            } else {
                "COMPOUND SORTKEY"
            };
            ts.newline()
                .push(Token::Raw(keyword.into()))
                .lparen()
                .ident_list(names)
                .rparen();
        }
    }

    ts
}
