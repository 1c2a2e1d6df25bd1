//! Snowflake SQL dialect.
//!
//! Snowflake features:
//! - ANSI identifier quoting (`"`)
//! - Positional `?` bind parameters
//! - `CREATE TABLE ... AS` for staging (no `SELECT ... INTO`)
//! - BOOLAND_AGG / BOOLOR_AGG instead of BOOL_AND / BOOL_OR
//! - Primary and foreign keys are accepted but not enforced

use super::helpers;
use super::SqlDialect;

/// Snowflake SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake;

impl SqlDialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_question(n)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_snowflake(name)
    }

    fn columns_query(&self) -> String {
        helpers::columns_query_information_schema(self)
    }
}
