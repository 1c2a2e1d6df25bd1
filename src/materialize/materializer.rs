use tracing::{debug, info};

use super::{
    generate_table_definition, ColumnSpec, MaterializationPlan, MaterializeState,
    DEFAULT_ROW_LIMIT, DEFAULT_TEMP_PREFIX,
};
use crate::design::TableDesign;
use crate::error::{Error, Result};
use crate::executor::{table_columns, Executor};
use crate::sql::dialect::{Dialect, SqlDialect};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub schema: String,
    pub table: String,
    /// Columns of the created table, as introspected from the scratch table.
    pub columns: Vec<ColumnSpec>,
    /// Every statement executed, in order.
    pub statements: Vec<String>,
}

/// Runs the temp-table / introspect / swap protocol.
///
/// Two runs for the same target must not overlap; runs for different targets
/// are independent.
#[derive(Debug, Clone)]
pub struct Materializer {
    dialect: Dialect,
    row_limit: Option<u64>,
    temp_prefix: String,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl Materializer {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            row_limit: Some(DEFAULT_ROW_LIMIT),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }

    /// Cap on rows staged for type discovery; `None` stages everything.
    pub fn row_limit(mut self, limit: Option<u64>) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    pub fn plan(&self, source_query: &str, schema: &str, table: &str) -> MaterializationPlan {
        MaterializationPlan::with_temp_prefix(source_query, schema, table, &self.temp_prefix)
    }

    /// (Re-)create `schema.table` from `source_query`.
    ///
    /// Input problems (empty names, a query that cannot be staged) fail before
    /// anything is executed. After that, any failure aborts the run and is
    /// returned as [`Error::Materialize`] with the last state reached. Nothing
    /// is retried or rolled back.
    pub async fn materialize<E: Executor + ?Sized>(
        &self,
        executor: &E,
        source_query: &str,
        schema: &str,
        table: &str,
        design: &TableDesign,
    ) -> Result<MaterializeReport> {
        let plan = self.plan(source_query, schema, table);
        plan.validate()?;
        let staged = plan.stage_temp(self.dialect, self.row_limit)?;

        let mut run = Run::new(executor, &plan);

        run.execute(plan.drop_temp(self.dialect)).await?;
        run.advance(MaterializeState::TempDropped);

        run.execute(staged).await?;
        run.advance(MaterializeState::TempPopulated);

        let columns = run.introspect(self.dialect).await?;
        run.advance(MaterializeState::SchemaIntrospected);

        let create = generate_table_definition(schema, table, &columns, design, self.dialect)
            .map_err(|e| run.fail(e))?;

        run.execute(plan.drop_final(self.dialect)).await?;
        run.advance(MaterializeState::FinalDropped);

        run.execute(create).await?;
        run.advance(MaterializeState::FinalCreated);

        run.execute(plan.insert_final(self.dialect)).await?;
        run.execute(plan.drop_temp(self.dialect)).await?;
        run.advance(MaterializeState::Done);

        Ok(MaterializeReport {
            schema: schema.to_string(),
            table: table.to_string(),
            columns,
            statements: run.statements,
        })
    }
}

/// State carried through one run.
struct Run<'a, E: ?Sized> {
    executor: &'a E,
    plan: &'a MaterializationPlan,
    state: MaterializeState,
    statements: Vec<String>,
}

impl<'a, E: Executor + ?Sized> Run<'a, E> {
    fn new(executor: &'a E, plan: &'a MaterializationPlan) -> Self {
        Self {
            executor,
            plan,
            state: MaterializeState::Start,
            statements: Vec::new(),
        }
    }

    fn advance(&mut self, state: MaterializeState) {
        info!(schema = %self.plan.schema, table = %self.plan.table, %state, "materialize");
        self.state = state;
    }

    fn fail(&self, source: Error) -> Error {
        Error::Materialize {
            table: format!("{}.{}", self.plan.schema, self.plan.table),
            state: self.state,
            source: Box::new(source),
        }
    }

    async fn execute(&mut self, statement: String) -> Result<()> {
        debug!(statement = %statement, "executing");
        match self.executor.execute(&statement, &[]).await {
            Ok(_) => {
                self.statements.push(statement);
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    async fn introspect(&mut self, dialect: Dialect) -> Result<Vec<ColumnSpec>> {
        let columns = table_columns(
            self.executor,
            dialect,
            &self.plan.schema,
            &self.plan.temp_table,
        )
        .await
        .map_err(|e| self.fail(e))?;
        self.statements.push(dialect.columns_query());
        Ok(columns)
    }
}
