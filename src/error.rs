//! Error types for pivot generation and table materialization.
//!
//! Every failure is surfaced to the caller with enough context to diagnose it
//! without re-running: the offending column, the active override map, or the
//! statement the database rejected. Nothing here is retried automatically.

use thiserror::Error;

use crate::config::SettingsError;
use crate::executor::ExecutionError;
use crate::materialize::MaterializeState;

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while generating or materializing tables.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input (schema, table, base or pivot columns) was missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Introspection returned no columns for the table.
    #[error("table {schema}.{table} empty or not found")]
    TableNotFound { schema: String, table: String },

    /// No override, exact rule or prefix rule matched the column.
    #[error("no aggregate function for column `{column}` (overrides: {overrides})")]
    UnresolvedAggregate { column: String, overrides: String },

    /// Two generated output columns would share the same name.
    #[error("output column `{alias}` generated more than once while pivoting `{column}`")]
    AliasCollision { column: String, alias: String },

    /// The executor rejected a statement.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A table definition was requested with zero columns.
    #[error("cannot define table {0} without columns")]
    NoColumns(String),

    /// A materialization run aborted part way through.
    ///
    /// `state` is the last state reached; every state is safe to re-run from
    /// the top, but a run that stopped after `FinalDropped` has left the target
    /// table missing until the next successful run.
    #[error("materializing {table} failed after {state}: {source}")]
    Materialize {
        table: String,
        state: MaterializeState,
        #[source]
        source: Box<Error>,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] SettingsError),
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The statement text that failed, if this error came from the executor.
    pub fn failing_statement(&self) -> Option<&str> {
        match self {
            Self::Execution(e) => Some(&e.statement),
            Self::Materialize { source, .. } => source.failing_statement(),
            _ => None,
        }
    }
}
