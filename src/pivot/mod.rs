//! Pivot query generation.
//!
//! A narrow fact table is turned into a wide one by crossing every remaining
//! column with each observed combination of the pivot columns:
//!
//! ```text
//! user_id | month   | num_logins          user_id | num_logins_month_2023_01 | num_logins_month_2023_02 | num_logins
//! --------+---------+-----------    ==>   --------+--------------------------+--------------------------+-----------
//!       1 | 2023-01 |          3                1 |                        3 |                        5 |          8
//!       1 | 2023-02 |          5
//! ```
//!
//! [`PivotQueryBuilder`] discovers the source columns and the distinct pivot
//! values through an [`Executor`](crate::executor::Executor) and renders the
//! query; [`PivotExpander`] produces the expressions for a single column.

mod builder;
mod expander;

pub use builder::PivotQueryBuilder;
pub use expander::{PivotExpander, PivotExpression};

use crate::aggregate::AggregateOverrides;
use crate::error::{Error, Result};

/// What to pivot and how.
#[derive(Debug, Clone, Default)]
pub struct PivotRequest {
    pub source_schema: String,
    pub source_table: String,
    /// Kept as-is and grouped by.
    pub base_columns: Vec<String>,
    /// Columns whose distinct values become buckets.
    pub pivot_columns: Vec<String>,
    /// Columns dropped from the output entirely.
    pub exclude_columns: Vec<String>,
    /// Columns that get per-bucket aggregates but no overall aggregate.
    pub exclude_from_overall: Vec<String>,
    pub overrides: AggregateOverrides,
}

impl PivotRequest {
    pub fn new(source_schema: impl Into<String>, source_table: impl Into<String>) -> Self {
        Self {
            source_schema: source_schema.into(),
            source_table: source_table.into(),
            ..Default::default()
        }
    }

    pub fn base_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn pivot_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_from_overall<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_from_overall = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn overrides(mut self, overrides: AggregateOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Schema, table, base columns and pivot columns are all required.
    pub fn validate(&self) -> Result<()> {
        if self.source_schema.is_empty() {
            return Err(Error::invalid("no source schema provided"));
        }
        if self.source_table.is_empty() {
            return Err(Error::invalid("no source table provided"));
        }
        if self.base_columns.is_empty() {
            return Err(Error::invalid("no base columns provided"));
        }
        if self.pivot_columns.is_empty() {
            return Err(Error::invalid("no pivot columns provided"));
        }
        Ok(())
    }

    /// Source columns that get expanded: everything not base, pivot or
    /// excluded, in discovery order.
    pub fn columns_to_pivot<'a>(&self, table_columns: &'a [String]) -> Vec<&'a String> {
        table_columns
            .iter()
            .filter(|c| {
                !self.base_columns.contains(c)
                    && !self.pivot_columns.contains(c)
                    && !self.exclude_columns.contains(c)
            })
            .collect()
    }
}
