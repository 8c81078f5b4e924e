use std::fmt;

use thiserror::Error;

use super::value::Value;

/// Returned by the single-value accessors when the result has more than one value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultError {
    #[error("expected at most one rule result but found {count}")]
    MultipleResults { count: usize },

    #[error("expected at most one output entry but found {count}")]
    MultipleEntries { count: usize },
}

/// The output bindings produced by one selected rule, in output clause order.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct RuleResult {
    rule_index: Option<usize>,
    rule_id: Option<String>,
    entries: Vec<(String, Value)>,
}

impl RuleResult {
    pub(crate) fn new(
        rule_index: Option<usize>,
        rule_id: Option<String>,
        entries: Vec<(String, Value)>,
    ) -> Self {
        Self {
            rule_index,
            rule_id,
            entries,
        }
    }

    /// Zero-based row of the rule that produced this result. `None` for an
    /// aggregated result, which has no single source rule.
    #[must_use]
    pub fn rule_index(&self) -> Option<usize> {
        self.rule_index
    }

    #[must_use]
    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    /// The value of the named output clause.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// The only entry of this result.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::MultipleEntries`] if the table has several output clauses.
    pub fn single_entry(&self) -> Result<Option<&Value>, ResultError> {
        match self.entries.as_slice() {
            [] => Ok(None),
            [(_, value)] => Ok(Some(value)),
            many => Err(ResultError::MultipleEntries { count: many.len() }),
        }
    }
}

impl fmt::Display for RuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// The outcome of evaluating a decision table: one [`RuleResult`] per rule
/// selected by the hit policy, in the order the policy produced them.
#[derive(Debug, Clone, PartialEq, Default)]
#[must_use]
pub struct DecisionResult {
    results: Vec<RuleResult>,
}

impl DecisionResult {
    pub(crate) fn new(results: Vec<RuleResult>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleResult> {
        self.results.iter()
    }

    #[must_use]
    pub fn first_result(&self) -> Option<&RuleResult> {
        self.results.first()
    }

    /// The only rule result.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError::MultipleResults`] if more than one rule was selected.
    pub fn single_result(&self) -> Result<Option<&RuleResult>, ResultError> {
        match self.results.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only)),
            many => Err(ResultError::MultipleResults { count: many.len() }),
        }
    }

    /// The only entry of the only rule result.
    ///
    /// # Errors
    ///
    /// Returns [`ResultError`] if there is more than one result or entry.
    pub fn single_entry(&self) -> Result<Option<&Value>, ResultError> {
        match self.single_result()? {
            Some(result) => result.single_entry(),
            None => Ok(None),
        }
    }

    /// The values of the named output clause across all results.
    #[must_use]
    pub fn collect_entries(&self, name: &str) -> Vec<&Value> {
        self.results.iter().filter_map(|r| r.get(name)).collect()
    }
}

impl<'a> IntoIterator for &'a DecisionResult {
    type Item = &'a RuleResult;
    type IntoIter = std::slice::Iter<'a, RuleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for DecisionResult {
    type Item = RuleResult;
    type IntoIter = std::vec::IntoIter<RuleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{result}")?;
        }
        write!(f, "]")
    }
}
