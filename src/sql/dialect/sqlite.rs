//! SQLite SQL dialect.
//!
//! SQLite features:
//! - ANSI identifier quoting (`"`)
//! - Numbered `?n` bind parameters
//! - `CREATE TABLE ... AS` for staging
//! - Column introspection through the `pragma_table_info` table-valued function
//! - Declared column types are free-form text; an expression column may have none

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_numbered_question(n)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlite(name)
    }

    fn columns_query(&self) -> String {
        // pragma_table_info(table, schema)
        format!(
            "SELECT name, type FROM pragma_table_info({}, {}) ORDER BY cid",
            self.placeholder(2),
            self.placeholder(1)
        )
    }
}
