use serde::{Deserialize, Serialize};

use super::{AggregateFunction, AggregateOverride, AggregateOverrides, AggregateRule};
use crate::error::{Error, Result};

/// Ordered prefix → rule table.
///
/// Kept as a list, never a map: the first matching prefix wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRules {
    rules: Vec<(String, AggregateRule)>,
}

impl Default for AggregateRules {
    fn default() -> Self {
        use AggregateFunction::*;

        let groups: [(&[&str], AggregateFunction); 6] = [
            (&["first", "min", "least"], Min),
            (
                &["most_recent", "max", "most", "last", "longest", "latest"],
                Max,
            ),
            (&["num", "sum", "total", "count"], Sum),
            (&["list"], ListAgg),
            (&["and", "bool_and"], BoolAnd),
            (&["or", "bool_or"], BoolOr),
        ];

        let rules = groups
            .iter()
            .flat_map(|(prefixes, function)| {
                prefixes
                    .iter()
                    .map(move |p| (p.to_string(), AggregateRule::new(*function)))
            })
            .collect();
        Self { rules }
    }
}

impl AggregateRules {
    /// Build a table from `(prefix, rule)` pairs, keeping their order.
    pub fn new(rules: impl IntoIterator<Item = (String, AggregateRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Append a rule; it is tried after every existing rule.
    pub fn push(&mut self, prefix: impl Into<String>, rule: AggregateRule) {
        self.rules.push((prefix.into(), rule));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateRule)> {
        self.rules.iter().map(|(p, r)| (p.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Exact key lookup, no prefix matching.
    pub fn lookup(&self, key: &str) -> Option<&AggregateRule> {
        self.rules.iter().find(|(p, _)| p == key).map(|(_, r)| r)
    }

    /// Resolve a column name by exact match, then by ordered `prefix_` match.
    pub fn resolve(&self, name: &str) -> Option<&AggregateRule> {
        self.lookup(name).or_else(|| {
            self.rules
                .iter()
                .find(|(prefix, _)| {
                    name.strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('_'))
                })
                .map(|(_, r)| r)
        })
    }

    /// Resolve a column, giving an override for it precedence over naming.
    ///
    /// An alias override is looked up exactly in this table, then parsed as a
    /// function name. It is not resolved further: an alias naming another
    /// alias is an error.
    pub fn resolve_column(
        &self,
        column: &str,
        overrides: &AggregateOverrides,
    ) -> Result<AggregateRule> {
        let unresolved = || Error::UnresolvedAggregate {
            column: column.to_string(),
            overrides: overrides.to_string(),
        };

        match overrides.get(column) {
            Some(AggregateOverride::Rule(rule)) => Ok(rule.clone()),
            Some(AggregateOverride::Alias(alias)) => self
                .lookup(alias)
                .cloned()
                .or_else(|| alias.parse().ok().map(AggregateRule::new))
                .ok_or_else(unresolved),
            None => self.resolve(column).cloned().ok_or_else(unresolved),
        }
    }
}
