use std::collections::HashSet;

use tracing::{debug, info};

use super::{PivotExpander, PivotExpression, PivotRequest};
use crate::aggregate::AggregateRules;
use crate::error::{Error, Result};
use crate::executor::{table_columns, Executor};
use crate::sql::dialect::Dialect;
use crate::sql::token::{Token, TokenStream};
use crate::value::Row;

/// Builds pivot queries from live table contents.
///
/// The only database access is the two discovery queries (columns, distinct
/// pivot values); the result is plain query text with no side effects.
#[derive(Debug, Clone, Default)]
pub struct PivotQueryBuilder {
    dialect: Dialect,
    rules: AggregateRules,
}

impl PivotQueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            rules: AggregateRules::default(),
        }
    }

    /// Replace the built-in aggregate rule table.
    pub fn with_rules(mut self, rules: AggregateRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Discover columns and pivot values, then render the query.
    pub async fn build<E: Executor + ?Sized>(
        &self,
        executor: &E,
        request: &PivotRequest,
    ) -> Result<String> {
        request.validate()?;

        let columns: Vec<String> = table_columns(
            executor,
            self.dialect,
            &request.source_schema,
            &request.source_table,
        )
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
        if columns.is_empty() {
            return Err(Error::TableNotFound {
                schema: request.source_schema.clone(),
                table: request.source_table.clone(),
            });
        }

        let distinct_rows = executor
            .execute(&self.distinct_query(request), &[])
            .await?;
        info!(
            table = %format!("{}.{}", request.source_schema, request.source_table),
            columns = columns.len(),
            buckets = distinct_rows.len(),
            "discovered pivot source"
        );

        self.render(request, &columns, &distinct_rows)
    }

    /// `SELECT DISTINCT` over the pivot columns.
    pub fn distinct_query(&self, request: &PivotRequest) -> String {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::Distinct)
            .space()
            .ident_list(&request.pivot_columns)
            .space()
            .push(Token::From)
            .space()
            .push(Token::QualifiedIdent {
                schema: Some(request.source_schema.clone()),
                name: request.source_table.clone(),
            });
        ts.serialize(self.dialect)
    }

    /// Render the pivot query from already discovered columns and rows.
    ///
    /// Every output name must be unique across the whole select list; two
    /// buckets whose values sanitize identically fail with
    /// [`Error::AliasCollision`].
    pub fn render(
        &self,
        request: &PivotRequest,
        table_columns: &[String],
        distinct_rows: &[Row],
    ) -> Result<String> {
        request.validate()?;

        let expander = PivotExpander::new(&self.rules, &request.overrides, self.dialect)
            .exclude_from_overall(&request.exclude_from_overall);

        let mut expressions: Vec<PivotExpression> = Vec::new();
        for column in request.columns_to_pivot(table_columns) {
            expressions.extend(expander.expand(column, &request.pivot_columns, distinct_rows)?);
        }
        debug!(expressions = expressions.len(), "expanded pivot columns");

        let mut names: HashSet<&str> = request.base_columns.iter().map(String::as_str).collect();
        for expr in &expressions {
            if !names.insert(&expr.alias) {
                return Err(Error::AliasCollision {
                    column: expr.source_column.clone(),
                    alias: expr.alias.clone(),
                });
            }
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Select).newline();
        base_column_lines(&mut ts, &request.base_columns);
        for expr in &expressions {
            ts.indent(1)
                .comma()
                .space()
                .append(&expr.to_tokens())
                .newline();
        }

        ts.push(Token::From)
            .newline()
            .indent(1)
            .push(Token::Bare(request.source_schema.clone()))
            .push(Token::Dot)
            .push(Token::Bare(request.source_table.clone()))
            .newline();

        ts.push(Token::GroupBy).newline();
        base_column_lines(&mut ts, &request.base_columns);

        Ok(ts.serialize(self.dialect))
    }
}

/// One base column per line, leading commas after the first.
fn base_column_lines(ts: &mut TokenStream, columns: &[String]) {
    for (i, column) in columns.iter().enumerate() {
        ts.indent(1);
        if i > 0 {
            ts.comma().space();
        }
        ts.push(Token::Bare(column.clone())).newline();
    }
}
