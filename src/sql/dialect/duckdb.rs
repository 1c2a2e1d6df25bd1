//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - ANSI identifier quoting (`"`)
//! - Positional `?` bind parameters
//! - `CREATE TABLE ... AS` for staging
//! - LISTAGG accepted as an alias of STRING_AGG

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_question(n)
    }

    fn columns_query(&self) -> String {
        helpers::columns_query_information_schema(self)
    }
}
