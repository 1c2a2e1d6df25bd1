//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Numbered `$n` bind parameters
//! - `SELECT ... INTO` for staging result sets
//! - Native BOOL_AND / BOOL_OR aggregates
//! - No LISTAGG

use super::helpers;
use super::{SqlDialect, StagingStrategy};

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn supports_function(&self, name: &str) -> bool {
        helpers::supports_function_postgres(name)
    }

    fn staging_strategy(&self) -> StagingStrategy {
        StagingStrategy::SelectInto
    }
}
