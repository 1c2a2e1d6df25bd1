//! SQL generation module.
//!
//! Everything that turns values into SQL text lives here:
//!
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`ddl`] - CREATE TABLE / DROP TABLE builders
//! - [`dml`] - INSERT ... SELECT and query staging
//! - [`lexer`] - Scanner used to splice clauses into caller-supplied queries

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod lexer;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, StagingStrategy};
pub use token::{Token, TokenStream};

pub use ddl::{ColumnSpec, CreateTable, DropTable};
pub use dml::{InsertSelect, StageQuery};
