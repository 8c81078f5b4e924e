use thiserror::Error;

use crate::expression::ExpressionError;
use crate::transform::TransformError;
use crate::{ClauseKind, HitPolicy, Value};

/// Failures that abort a decision table evaluation.
///
/// Every variant is fatal to the evaluation that raised it: no partial result
/// is returned. A null or missing variable is never an error.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// A clause declares a type that the transformer factory does not know.
    #[error("no transformer registered for type '{type_name}' of {kind} clause '{clause}'")]
    UnknownType {
        clause: String,
        kind: ClauseKind,
        type_name: String,
    },

    /// A transformer rejected the value bound to a clause.
    #[error("cannot coerce {value} of {kind} clause '{clause}' to type '{type_name}': {source}")]
    Coercion {
        clause: String,
        kind: ClauseKind,
        type_name: String,
        value: Value,
        source: TransformError,
    },

    /// The expression evaluator failed on a condition or output expression.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// A single-hit policy matched more than one rule.
    #[error("hit policy {policy} allows a single match but rules {} matched", rules.join(", "))]
    MultipleMatches { policy: HitPolicy, rules: Vec<String> },

    /// A UNIQUE table matched no rule.
    #[error("hit policy UNIQUE requires exactly one match but no rule matched")]
    NoMatch,

    /// ANY matched rules whose outputs differ.
    #[error("hit policy ANY requires equal outputs but rules {first} and {second} differ")]
    ConflictingOutputs { first: String, second: String },

    /// An arithmetic aggregator met a value it cannot fold.
    #[error("aggregator {aggregator} cannot fold non-numeric value {value}")]
    NonNumericAggregation {
        aggregator: crate::Aggregator,
        value: Value,
    },
}
