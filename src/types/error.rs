use thiserror::Error;

use super::clause::ClauseKind;
use super::hit_policy::{Aggregator, HitPolicy};

/// Structural problems detected while building a [`DecisionTable`](super::DecisionTable).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate {kind} clause name '{name}'")]
    DuplicateClause { kind: ClauseKind, name: String },

    #[error("decision table has no output clauses; at least one is required")]
    NoOutputs,

    #[error("rule {rule} has {found} input entries but the table has {expected} input clauses")]
    InputArity {
        rule: String,
        expected: usize,
        found: usize,
    },

    #[error("rule {rule} has {found} output entries but the table has {expected} output clauses")]
    OutputArity {
        rule: String,
        expected: usize,
        found: usize,
    },

    #[error("aggregator {aggregator} requires hit policy COLLECT, found {policy}")]
    AggregatorRequiresCollect {
        aggregator: Aggregator,
        policy: HitPolicy,
    },

    #[error("aggregator {aggregator} requires exactly one output clause, found {outputs}")]
    AggregatorRequiresSingleOutput {
        aggregator: Aggregator,
        outputs: usize,
    },
}
