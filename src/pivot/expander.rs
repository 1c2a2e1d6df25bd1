//! Expansion of one source column into per-bucket aggregate expressions.

use std::collections::HashSet;

use crate::aggregate::{AggregateFunction, AggregateOverrides, AggregateRules};
use crate::error::{Error, Result};
use crate::sanitize::predicate;
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::token::{Token, TokenStream};
use crate::value::Row;

/// One generated select-list item.
///
/// With a `case_test` this is `FN(CASE WHEN <test> THEN <col> ELSE <default> END)`;
/// without one it is the overall `FN(<col>)` across every bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotExpression {
    pub source_column: String,
    pub function: AggregateFunction,
    pub case_test: Option<String>,
    pub default_literal: String,
    pub alias: String,
}

impl PivotExpression {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::FunctionName(self.function.to_string())).lparen();

        match &self.case_test {
            Some(test) => {
                ts.push(Token::Case)
                    .space()
                    .push(Token::When)
                    .space()
                    .push(Token::Raw(test.clone()))
                    .space()
                    .push(Token::Then)
                    .space()
                    .push(Token::Bare(self.source_column.clone()))
                    .space()
                    .push(Token::Else)
                    .space()
                    .push(Token::Raw(self.default_literal.clone()))
                    .space()
                    .push(Token::End);
            }
            None => {
                ts.push(Token::Bare(self.source_column.clone()));
            }
        }

        ts.rparen()
            .space()
            .push(Token::As)
            .space()
            .push(Token::Bare(self.alias.clone()));
        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

/// Expands columns against the distinct combinations of the pivot columns.
#[derive(Debug, Clone, Copy)]
pub struct PivotExpander<'a> {
    rules: &'a AggregateRules,
    overrides: &'a AggregateOverrides,
    exclude_from_overall: &'a [String],
    dialect: Dialect,
}

impl<'a> PivotExpander<'a> {
    pub fn new(rules: &'a AggregateRules, overrides: &'a AggregateOverrides, dialect: Dialect) -> Self {
        Self {
            rules,
            overrides,
            exclude_from_overall: &[],
            dialect,
        }
    }

    /// Columns that get no overall (unbucketed) aggregate.
    pub fn exclude_from_overall(mut self, columns: &'a [String]) -> Self {
        self.exclude_from_overall = columns;
        self
    }

    /// One expression per distinct row, in row order, then the overall
    /// aggregate unless `column` is excluded from it.
    ///
    /// Fails when the column's aggregate cannot be resolved, when a row's
    /// width differs from the pivot column count, or when two rows sanitize
    /// to the same alias.
    pub fn expand(
        &self,
        column: &str,
        pivot_columns: &[String],
        distinct_rows: &[Row],
    ) -> Result<Vec<PivotExpression>> {
        let rule = self.rules.resolve_column(column, self.overrides)?;
        if !self.dialect.supports_function(&rule.function.to_string()) {
            return Err(Error::invalid(format!(
                "{} is not available on {}; override the aggregate for `{column}`",
                rule.function, self.dialect
            )));
        }

        let mut seen = HashSet::with_capacity(distinct_rows.len() + 1);
        let mut expressions = Vec::with_capacity(distinct_rows.len() + 1);

        for row in distinct_rows {
            if row.len() != pivot_columns.len() {
                return Err(Error::invalid(format!(
                    "distinct row has {} values for {} pivot columns",
                    row.len(),
                    pivot_columns.len()
                )));
            }

            let (tests, names): (Vec<String>, Vec<String>) = pivot_columns
                .iter()
                .zip(row)
                .map(|(pivot, value)| predicate(pivot, value, self.dialect))
                .unzip();

            let alias = format!("{column}_{}", names.join("_"));
            if !seen.insert(alias.clone()) {
                return Err(Error::AliasCollision {
                    column: column.to_string(),
                    alias,
                });
            }

            expressions.push(PivotExpression {
                source_column: column.to_string(),
                function: rule.function,
                case_test: Some(tests.join(" AND ")),
                default_literal: rule.default_literal.clone(),
                alias,
            });
        }

        if !self.exclude_from_overall.iter().any(|c| c == column) {
            if seen.contains(column) {
                return Err(Error::AliasCollision {
                    column: column.to_string(),
                    alias: column.to_string(),
                });
            }
            expressions.push(PivotExpression {
                source_column: column.to_string(),
                function: rule.function,
                case_test: None,
                default_literal: rule.default_literal,
                alias: column.to_string(),
            });
        }

        Ok(expressions)
    }
}
