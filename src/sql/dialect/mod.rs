//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for the engine differences
//! that matter when generating pivot queries and materializing tables.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting and string literal escaping
//! - Bind parameter placeholders: `$1` (Postgres/Redshift), `?` (Snowflake/DuckDB), `?1` (SQLite)
//! - Aggregate function spelling (`BOOL_AND` vs `BOOLAND_AGG`)
//! - Column introspection: `pg_catalog`, `information_schema`, `pragma_table_info`
//! - Staging a SELECT into a table: `SELECT ... INTO` vs `CREATE TABLE ... AS`
//! - Physical layout clauses (`DISTSTYLE`, `DISTKEY`, `SORTKEY`)
//!
//! # Usage
//!
//! ```ignore
//! use tablecraft::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Redshift;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```
//!
//! # Feature Matrix
//!
//! | Feature | Redshift | PostgreSQL | Snowflake | DuckDB | SQLite |
//! |---------|----------|------------|-----------|--------|--------|
//! | SELECT ... INTO staging | ✓ | ✓ | ❌ | ❌ | ❌ |
//! | CREATE TABLE AS staging | ✓ | ✓ | ✓ | ✓ | ✓ |
//! | DISTSTYLE / DISTKEY / SORTKEY | ✓ | ❌ | ❌ | ❌ | ❌ |
//! | BOOL_AND / BOOL_OR | ✓ | ✓ | BOOLAND_AGG | ✓ | ❌ (MIN / MAX) |
//! | LISTAGG | ✓ | ❌ (STRING_AGG) | ✓ | ✓ | ❌ (GROUP_CONCAT) |
//!
//! Legend: ✓ = supported, ❌ = not supported
//!
//! The core never branches on engine identity; everything engine-specific goes
//! through this trait.

mod duckdb;
pub mod helpers;
mod postgres;
mod redshift;
mod snowflake;
mod sqlite;

pub use duckdb::DuckDb;
pub use postgres::Postgres;
pub use redshift::Redshift;
pub use snowflake::Snowflake;
pub use sqlite::Sqlite;

use std::str::FromStr;

use super::token::TokenStream;
use crate::design::TableDesign;

/// How a query's result set is redirected into a staging table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingStrategy {
    /// `SELECT <list> INTO <table> FROM ...` - the clause is spliced in front
    /// of the query's top-level `FROM`.
    SelectInto,
    /// `CREATE TABLE <table> AS <query>`.
    CreateTableAs,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow PostgreSQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (schema, table, column).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All supported dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Bind parameter placeholder for the `n`th (1-based) parameter.
    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_dollar(n)
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    /// Whether the (possibly remapped) function can be emitted at all.
    fn supports_function(&self, name: &str) -> bool {
        let _ = name;
        true
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Query returning `(column_name, sql_type)` rows for one table, in
    /// ordinal order. Binds the schema as parameter 1 and the table as 2.
    fn columns_query(&self) -> String {
        helpers::columns_query_pg_catalog(self)
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    /// How a SELECT is staged into a scratch table for type discovery.
    fn staging_strategy(&self) -> StagingStrategy {
        StagingStrategy::CreateTableAs
    }

    /// Row-count cap appended to staged queries.
    fn emit_limit(&self, limit: u64) -> TokenStream {
        helpers::emit_limit_standard(limit)
    }

    /// Whether this dialect supports IF EXISTS for DROP statements.
    fn supports_if_exists(&self) -> bool {
        true
    }

    /// Whether PRIMARY KEY / FOREIGN KEY lines are emitted in CREATE TABLE.
    fn supports_table_constraints(&self) -> bool {
        true
    }

    /// Trailing physical-layout clauses for CREATE TABLE.
    ///
    /// Only column stores with distribution hints emit anything; every other
    /// dialect ignores the distribution and sort settings of the design.
    fn emit_table_options(&self, design: &TableDesign) -> TokenStream {
        let _ = design;
        TokenStream::new()
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Redshift,
    Postgres,
    Snowflake,
    DuckDb,
    Sqlite,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Redshift => &Redshift,
            Dialect::Postgres => &Postgres,
            Dialect::Snowflake => &Snowflake,
            Dialect::DuckDb => &DuckDb,
            Dialect::Sqlite => &Sqlite,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn placeholder(&self, n: usize) -> String {
        self.dialect().placeholder(n)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn supports_function(&self, name: &str) -> bool {
        self.dialect().supports_function(name)
    }

    fn columns_query(&self) -> String {
        self.dialect().columns_query()
    }

    fn staging_strategy(&self) -> StagingStrategy {
        self.dialect().staging_strategy()
    }

    fn emit_limit(&self, limit: u64) -> TokenStream {
        self.dialect().emit_limit(limit)
    }

    fn supports_if_exists(&self) -> bool {
        self.dialect().supports_if_exists()
    }

    fn supports_table_constraints(&self) -> bool {
        self.dialect().supports_table_constraints()
    }

    fn emit_table_options(&self, design: &TableDesign) -> TokenStream {
        self.dialect().emit_table_options(design)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redshift" => Ok(Dialect::Redshift),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "snowflake" => Ok(Dialect::Snowflake),
            "duckdb" => Ok(Dialect::DuckDb),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(format!("unsupported dialect: {s}")),
        }
    }
}
