//! Aggregate resolution: which function collapses a column while pivoting.
//!
//! Column names carry their aggregation by convention: `num_logins` is summed,
//! `last_seen` takes the maximum, `first_seen` the minimum. A column is
//! resolved by, in order:
//!
//! 1. an explicit per-column [`AggregateOverride`];
//! 2. an exact match against the rule table's prefixes;
//! 3. the first rule (in table order) whose `prefix + "_"` starts the name.
//!
//! Matching is case-sensitive. Rule order is load-bearing: `most_recent` must
//! be listed before `most` for the former to ever win.
//!
//! Averages are not representable. An average of per-bucket averages needs a
//! weighting that the column name cannot carry.

mod overrides;
mod rules;

pub use overrides::{AggregateOverride, AggregateOverrides};
pub use rules::AggregateRules;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Aggregate functions a pivoted column can be collapsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregateFunction {
    Min,
    Max,
    Sum,
    ListAgg,
    BoolAnd,
    BoolOr,
}

impl AggregateFunction {
    /// Literal used for rows outside a pivot bucket.
    pub fn default_literal(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "0",
            AggregateFunction::BoolAnd => "true",
            _ => "NULL",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::ListAgg => "LISTAGG",
            AggregateFunction::BoolAnd => "BOOL_AND",
            AggregateFunction::BoolOr => "BOOL_OR",
        })
    }
}

impl FromStr for AggregateFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            "SUM" => Ok(AggregateFunction::Sum),
            "LISTAGG" => Ok(AggregateFunction::ListAgg),
            "BOOL_AND" => Ok(AggregateFunction::BoolAnd),
            "BOOL_OR" => Ok(AggregateFunction::BoolOr),
            "AVG" | "AVERAGE" | "MEAN" => {
                Err(format!("{s}: averages cannot be pivoted without a weighting"))
            }
            _ => Err(format!("unknown aggregate function: {s}")),
        }
    }
}

impl TryFrom<String> for AggregateFunction {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AggregateFunction> for String {
    fn from(f: AggregateFunction) -> Self {
        f.to_string()
    }
}

/// An aggregate function and the literal used outside its pivot bucket.
///
/// The default literal is trusted SQL text (`0`, `NULL`, `true`) and is
/// emitted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRule {
    pub function: AggregateFunction,
    pub default_literal: String,
}

impl AggregateRule {
    /// Rule using the function's canonical default literal.
    pub fn new(function: AggregateFunction) -> Self {
        Self {
            function,
            default_literal: function.default_literal().to_string(),
        }
    }

    pub fn with_default(function: AggregateFunction, default_literal: impl Into<String>) -> Self {
        Self {
            function,
            default_literal: default_literal.into(),
        }
    }
}

impl fmt::Display for AggregateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.function, self.default_literal)
    }
}
