use std::fmt;

use super::clause::{InputClause, OutputClause};
use super::error::TableError;
use super::hit_policy::{Aggregator, HitPolicy};
use super::rule::{Rule, RuleBuilder};

/// Builder for constructing a [`DecisionTable`].
///
/// Clauses and rules are positional: the n-th `when`/`any` of a rule tests the
/// n-th input clause, and the n-th `then` produces the n-th output clause.
///
/// # Example
///
/// ```
/// use dectable::{DecisionTableBuilder, HitPolicy, InputClause, OutputClause};
///
/// let table = DecisionTableBuilder::new("discount")
///     .input(InputClause::typed("age", "integer"))
///     .output(OutputClause::new("discount"))
///     .hit_policy(HitPolicy::First)
///     .rule(|r| r.when("< 18").then("0.2"))
///     .rule(|r| r.when(">= 65").then("0.3"))
///     .rule(|r| r.any().then("0.0"))
///     .build()
///     .unwrap();
/// assert_eq!(table.rules().len(), 3);
/// ```
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct DecisionTableBuilder {
    id: String,
    name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    inputs: Vec<InputClause>,
    outputs: Vec<OutputClause>,
    #[cfg_attr(feature = "serde", serde(default))]
    rules: Vec<Rule>,
    #[cfg_attr(feature = "serde", serde(default))]
    hit_policy: HitPolicy,
    aggregator: Option<Aggregator>,
}

impl DecisionTableBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
            hit_policy: HitPolicy::default(),
            aggregator: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn input(mut self, clause: InputClause) -> Self {
        self.inputs.push(clause);
        self
    }

    #[must_use]
    pub fn output(mut self, clause: OutputClause) -> Self {
        self.outputs.push(clause);
        self
    }

    #[must_use]
    pub fn hit_policy(mut self, policy: HitPolicy) -> Self {
        self.hit_policy = policy;
        self
    }

    /// Aggregate the results of a COLLECT table with a single output clause.
    #[must_use]
    pub fn aggregate(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Define a rule. Rules keep the order in which they are added.
    #[must_use]
    pub fn rule(mut self, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        self.rules.push(f(RuleBuilder::default()).build());
        self
    }

    /// Validate the table structure and freeze it.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if clause names collide, there are no outputs,
    /// a rule's entry count does not match the clauses, or an aggregator is
    /// used where it is not allowed.
    pub fn build(self) -> Result<DecisionTable, TableError> {
        let table = DecisionTable {
            id: self.id,
            name: self.name,
            inputs: self.inputs,
            outputs: self.outputs,
            rules: self.rules,
            hit_policy: self.hit_policy,
            aggregator: self.aggregator,
        };
        crate::compile::validate(&table)?;
        Ok(table)
    }
}

/// A validated, immutable decision table. Thread-safe and designed to live behind `Arc`.
///
/// With the `serde` feature a deserialized table goes through the same
/// validation as [`DecisionTableBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "DecisionTableBuilder"))]
pub struct DecisionTable {
    id: String,
    name: Option<String>,
    inputs: Vec<InputClause>,
    outputs: Vec<OutputClause>,
    rules: Vec<Rule>,
    hit_policy: HitPolicy,
    aggregator: Option<Aggregator>,
}

impl DecisionTable {
    #[must_use]
    pub fn builder(id: impl Into<String>) -> DecisionTableBuilder {
        DecisionTableBuilder::new(id)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn inputs(&self) -> &[InputClause] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[OutputClause] {
        &self.outputs
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn hit_policy(&self) -> HitPolicy {
        self.hit_policy
    }

    #[must_use]
    pub fn aggregator(&self) -> Option<Aggregator> {
        self.aggregator
    }
}

impl TryFrom<DecisionTableBuilder> for DecisionTable {
    type Error = TableError;

    fn try_from(builder: DecisionTableBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl fmt::Display for DecisionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecisionTable({}, {} inputs, {} outputs, {} rules, {}",
            self.id,
            self.inputs.len(),
            self.outputs.len(),
            self.rules.len(),
            self.hit_policy,
        )?;
        if let Some(aggregator) = self.aggregator {
            write!(f, " {aggregator}")?;
        }
        write!(f, ")")
    }
}
