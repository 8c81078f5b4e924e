//! Decision table evaluation.
//!
//! A [`DecisionTable`] pairs input and output clauses with a list of rules and
//! a [`HitPolicy`]. A [`DecisionEngine`] evaluates a table against a set of
//! [`Variables`]: input values are coerced to their declared types, rules are
//! matched, and the hit policy picks which rules contribute to the
//! [`DecisionResult`].

mod compile;
mod engine;
mod error;
mod evaluate;
mod expression;
pub mod parse;
mod resolve;
mod simple;
pub mod transform;
mod types;

pub use engine::{DecisionEngine, DecisionEngineBuilder};
pub use error::EvaluateError;
pub use expression::{ExpressionError, ExpressionEvaluator};
pub use simple::SimpleExpressionEvaluator;
pub use transform::{
    coerce, DataTypeTransformer, DefaultTransformerFactory, TransformError, TransformerFactory,
};
pub use types::{
    Aggregator, Clause, ClauseKind, ClauseRole, CompareOp, DecisionResult, DecisionTable,
    DecisionTableBuilder, EvaluationReport, Expression, HitPolicy, Input, InputClause, InputEntry,
    Output, OutputClause, ResultError, Rule, RuleBuilder, RuleResult, TableError,
    UnknownNameError, Value, VariableContext, Variables,
};
