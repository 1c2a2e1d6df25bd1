//! Statement execution seam.
//!
//! Connection handling lives outside this crate: a backing engine is plugged in
//! by implementing [`Executor`]. Every call is one blocking round trip from the
//! caller's point of view; the pivot builder and the materializer await each
//! statement before issuing the next, because later statements depend on the
//! shape returned by earlier ones.
//!
//! ```text
//! ┌────────────────────┐   statement + params   ┌──────────────────┐
//! │ PivotQueryBuilder  │ ─────────────────────▶ │     Executor     │
//! │ Materializer       │ ◀───────────────────── │ (SQLite, custom) │
//! └────────────────────┘      rows / error      └──────────────────┘
//! ```

mod introspect;
mod sqlite;

pub use introspect::table_columns;
pub use sqlite::SqliteExecutor;

use async_trait::async_trait;
use thiserror::Error;

use crate::value::{Row, Value};

/// A statement the engine rejected, with the statement text attached.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}\nstatement:\n{statement}")]
pub struct ExecutionError {
    /// Engine error message.
    pub message: String,
    /// The statement that failed.
    pub statement: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            statement: statement.into(),
        }
    }
}

/// Executes SQL against a live database.
///
/// Implementations must support DDL, parameterized SELECT, and return result
/// rows as ordered tuples of nullable scalars. Statements that produce no rows
/// return an empty vector.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for &E {
    async fn execute(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        (**self).execute(statement, params).await
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Box<E> {
    async fn execute(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        (**self).execute(statement, params).await
    }
}
