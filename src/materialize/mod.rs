//! Materializing a query as a typed, keyed table.
//!
//! Column types are not inferred statically: the query is run into a scratch
//! table (capped to a few rows), the scratch table is introspected, and the
//! final table is created from what the engine reported. The data itself is
//! then inserted by re-running the source query.
//!
//! ```text
//! Start ──▶ TempDropped ──▶ TempPopulated ──▶ SchemaIntrospected
//!                                                   │
//!   Done ◀── FinalCreated ◀── FinalDropped ◀────────┘
//! ```
//!
//! DDL is not transactional across these steps. Each step starts by dropping
//! what it is about to create, so a failed run is repaired by running it again
//! from the top.

mod materializer;

pub use materializer::{MaterializeReport, Materializer};

use std::fmt;

use crate::design::TableDesign;
use crate::error::{Error, Result};
use crate::sql::ddl::{CreateTable, DropTable};
use crate::sql::dialect::Dialect;
use crate::sql::dml::{InsertSelect, StageQuery};

pub use crate::sql::ddl::ColumnSpec;

/// Prefix of the scratch table used for type discovery.
pub const DEFAULT_TEMP_PREFIX: &str = "temp_";

/// Rows staged into the scratch table; only the shape matters.
pub const DEFAULT_ROW_LIMIT: u64 = 1;

/// Progress of one materialization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MaterializeState {
    Start,
    TempDropped,
    TempPopulated,
    SchemaIntrospected,
    FinalDropped,
    FinalCreated,
    Done,
}

impl fmt::Display for MaterializeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaterializeState::Start => "start",
            MaterializeState::TempDropped => "temp table dropped",
            MaterializeState::TempPopulated => "temp table populated",
            MaterializeState::SchemaIntrospected => "schema introspected",
            MaterializeState::FinalDropped => "final table dropped",
            MaterializeState::FinalCreated => "final table created",
            MaterializeState::Done => "done",
        })
    }
}

/// `CREATE TABLE` for introspected columns plus the table design.
///
/// Fails with [`Error::NoColumns`] for an empty column list, and with
/// [`Error::InvalidArgument`] when the design names unknown columns.
pub fn generate_table_definition(
    schema: &str,
    table: &str,
    columns: &[ColumnSpec],
    design: &TableDesign,
    dialect: Dialect,
) -> Result<String> {
    if columns.is_empty() {
        return Err(Error::NoColumns(format!("{schema}.{table}")));
    }
    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    design.validate(&names)?;

    Ok(CreateTable::new(table)
        .schema(schema)
        .columns(columns.iter().cloned())
        .design(design.clone())
        .to_sql(dialect))
}

/// Statements for one run, derived from the inputs alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializationPlan {
    pub source_query: String,
    pub schema: String,
    pub table: String,
    pub temp_table: String,
}

impl MaterializationPlan {
    pub fn new(
        source_query: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self::with_temp_prefix(source_query, schema, table, DEFAULT_TEMP_PREFIX)
    }

    pub fn with_temp_prefix(
        source_query: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        temp_prefix: &str,
    ) -> Self {
        let table = table.into();
        Self {
            source_query: source_query.into(),
            schema: schema.into(),
            temp_table: format!("{temp_prefix}{table}"),
            table,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(Error::invalid("no schema provided"));
        }
        if self.table.is_empty() {
            return Err(Error::invalid("no table provided"));
        }
        if self.source_query.trim().is_empty() {
            return Err(Error::invalid(format!("empty query for {}", self.table)));
        }
        // the final cleanup drops the temp table
        if self.temp_table == self.table {
            return Err(Error::invalid(format!(
                "temp table name collides with {}; use a non-empty temp prefix",
                self.table
            )));
        }
        Ok(())
    }

    pub fn drop_temp(&self, dialect: Dialect) -> String {
        DropTable::new(&self.temp_table)
            .schema(&self.schema)
            .if_exists()
            .to_sql(dialect)
    }

    /// The source query redirected into the scratch table.
    pub fn stage_temp(&self, dialect: Dialect, row_limit: Option<u64>) -> Result<String> {
        let mut stage = StageQuery::new(&self.source_query, &self.temp_table).schema(&self.schema);
        if let Some(limit) = row_limit {
            stage = stage.row_limit(limit);
        }
        stage.to_sql(dialect)
    }

    pub fn drop_final(&self, dialect: Dialect) -> String {
        DropTable::new(&self.table)
            .schema(&self.schema)
            .if_exists()
            .to_sql(dialect)
    }

    /// `INSERT` of the unmodified source query into the final table.
    pub fn insert_final(&self, dialect: Dialect) -> String {
        InsertSelect::into(&self.table)
            .schema(&self.schema)
            .query(&self.source_query)
            .to_sql(dialect)
    }
}
