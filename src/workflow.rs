//! End-to-end operations: generate a pivot query, create a pivot table, and
//! create a table from a stored SELECT.
//!
//! These tie the pieces together with configuration. Callers that need finer
//! control use [`PivotQueryBuilder`] and [`Materializer`] directly.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{Settings, SettingsError};
use crate::design::TableDesign;
use crate::error::Result;
use crate::executor::Executor;
use crate::materialize::{MaterializeReport, Materializer};
use crate::pivot::{PivotQueryBuilder, PivotRequest};
use crate::sql::dialect::Dialect;

/// Configured entry points for one dialect.
#[derive(Debug, Clone)]
pub struct Workflow {
    settings: Settings,
    builder: PivotQueryBuilder,
    materializer: Materializer,
}

impl Workflow {
    pub fn new(dialect: Dialect) -> Self {
        Self::from_settings(Settings::default(), dialect)
    }

    /// Use the configured aggregate rules, row cap and scratch-table prefix.
    pub fn from_settings(settings: Settings, dialect: Dialect) -> Self {
        let builder = PivotQueryBuilder::new(dialect).with_rules(settings.aggregates.to_rules());
        let materializer = Materializer::new(dialect)
            .row_limit(settings.materialize.row_limit())
            .temp_prefix(settings.materialize.temp_prefix.clone());
        Self {
            settings,
            builder,
            materializer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate the pivot query text for `request`.
    pub async fn generate_pivot_query<E: Executor + ?Sized>(
        &self,
        executor: &E,
        request: &PivotRequest,
    ) -> Result<String> {
        self.builder.build(executor, request).await
    }

    /// Generate the pivot query and materialize it as `schema.table`.
    pub async fn create_pivot_table<E: Executor + ?Sized>(
        &self,
        executor: &E,
        request: &PivotRequest,
        schema: &str,
        table: &str,
        design: &TableDesign,
    ) -> Result<MaterializeReport> {
        let query = self.generate_pivot_query(executor, request).await?;
        info!(
            source = %format!("{}.{}", request.source_schema, request.source_table),
            target = %format!("{schema}.{table}"),
            "creating pivot table"
        );
        self.materialize(executor, &query, schema, table, design).await
    }

    /// Materialize an in-memory query.
    pub async fn materialize<E: Executor + ?Sized>(
        &self,
        executor: &E,
        query: &str,
        schema: &str,
        table: &str,
        design: &TableDesign,
    ) -> Result<MaterializeReport> {
        self.materializer
            .materialize(executor, query, schema, table, design)
            .await
    }

    /// (Re-)create `schema.table` from a stored query.
    ///
    /// The query is read from `sql_file`, or `<sql_directory>/<table>.sql`.
    /// The design is read from `design_file` (which must exist), or from
    /// `<design_directory>/<table>.toml` when present.
    pub async fn create_table_from_select<E: Executor + ?Sized>(
        &self,
        executor: &E,
        schema: &str,
        table: &str,
        sql_file: Option<&Path>,
        design_file: Option<&Path>,
    ) -> Result<MaterializeReport> {
        let sql_path = sql_file.map_or_else(|| self.settings.sql_path(table), Path::to_path_buf);
        if !sql_path.exists() {
            return Err(SettingsError::FileNotFound(sql_path).into());
        }
        let query = fs::read_to_string(&sql_path).map_err(SettingsError::from)?;

        let design = match design_file {
            Some(path) => TableDesign::load(path)?,
            None => TableDesign::load_optional(self.settings.design_path(table))?,
        };

        info!(query = %sql_path.display(), target = %format!("{schema}.{table}"), "creating table from select");
        self.materialize(executor, &query, schema, table, &design).await
    }
}
