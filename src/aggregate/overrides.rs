use std::collections::BTreeMap;
use std::fmt;

use super::{AggregateFunction, AggregateRule};
use crate::error::{Error, Result};

/// Explicit aggregate for one column, bypassing name-based inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOverride {
    /// Use this rule as given.
    Rule(AggregateRule),
    /// Key into the rule table (`"sum"`, `"most_recent"`) or a function name.
    Alias(String),
}

impl fmt::Display for AggregateOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateOverride::Rule(rule) => write!(f, "{rule}"),
            AggregateOverride::Alias(alias) => f.write_str(alias),
        }
    }
}

/// Per-column overrides, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOverrides {
    entries: BTreeMap<String, AggregateOverride>,
}

impl AggregateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: AggregateOverride) {
        self.entries.insert(column.into(), value);
    }

    /// Builder form of [`insert`](Self::insert) for an alias override.
    pub fn alias(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.insert(column, AggregateOverride::Alias(alias.into()));
        self
    }

    /// Builder form of [`insert`](Self::insert) for an explicit rule.
    pub fn rule(mut self, column: impl Into<String>, rule: AggregateRule) -> Self {
        self.insert(column, AggregateOverride::Rule(rule));
        self
    }

    pub fn get(&self, column: &str) -> Option<&AggregateOverride> {
        self.entries.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `column=alias` or `column=FUNCTION:default` items.
    pub fn parse_items<'a>(items: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut overrides = Self::new();
        for item in items {
            let (column, value) = item
                .split_once('=')
                .map(|(c, v)| (c.trim(), v.trim()))
                .filter(|(c, v)| !c.is_empty() && !v.is_empty())
                .ok_or_else(|| {
                    Error::invalid(format!("aggregate override `{item}` is not column=alias"))
                })?;

            let value = match value.split_once(':') {
                Some((function, default)) => {
                    let function: AggregateFunction = function.parse().map_err(Error::invalid)?;
                    AggregateOverride::Rule(AggregateRule::with_default(function, default))
                }
                None => AggregateOverride::Alias(value.to_string()),
            };
            overrides.insert(column, value);
        }
        Ok(overrides)
    }
}

impl fmt::Display for AggregateOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (column, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>> FromIterator<(K, AggregateOverride)> for AggregateOverrides {
    fn from_iter<I: IntoIterator<Item = (K, AggregateOverride)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (column, value) in iter {
            overrides.insert(column, value);
        }
        overrides
    }
}
