//! # tablecraft
//!
//! Generates pivot queries over narrow fact tables and materializes SELECT
//! queries as typed, keyed tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           PivotRequest (base / pivot columns)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [pivot: introspect + SELECT DISTINCT]
//! ┌─────────────────────────────────────────────────────────┐
//! │   PivotExpander (aggregate rules, sanitized aliases)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ query text
//! ┌─────────────────────────────────────────────────────────┐
//! │   Materializer: temp table → introspect → CREATE +      │
//! │   INSERT (TableDesign keys, dialect layout hints)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Executor]
//!                       database
//! ```
//!
//! All database access goes through the [`executor::Executor`] trait; all
//! engine-specific SQL goes through [`dialect::SqlDialect`].

pub mod aggregate;
pub mod config;
pub mod design;
pub mod error;
pub mod executor;
pub mod materialize;
pub mod pivot;
pub mod sanitize;
pub mod sql;
pub mod value;
pub mod workflow;

// Re-export SQL submodules at crate level for convenience
pub use sql::ddl;
pub use sql::dialect;
pub use sql::dml;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{
        AggregateFunction, AggregateOverride, AggregateOverrides, AggregateRule, AggregateRules,
    };
    pub use crate::design::{Columns, DistStyle, ForeignKey, TableDesign};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::error::{Error, Result};
    pub use crate::executor::{ExecutionError, Executor, SqliteExecutor};
    pub use crate::materialize::{
        generate_table_definition, ColumnSpec, MaterializationPlan, MaterializeReport,
        MaterializeState, Materializer,
    };
    pub use crate::pivot::{PivotExpander, PivotExpression, PivotQueryBuilder, PivotRequest};
    pub use crate::value::{Row, Value};
    pub use crate::workflow::Workflow;
}

// Also export at crate root for convenience
pub use dialect::Dialect;
pub use error::{Error, Result};
