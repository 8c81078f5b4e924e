use std::sync::Arc;

use thiserror::Error;

use crate::parse::ParseError;
use crate::{Expression, Value, VariableContext};

/// Failures raised while evaluating a condition or output expression.
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("invalid expression '{expression}': {source}")]
    Parse {
        expression: String,
        source: ParseError,
    },

    #[error("unknown variable '{name}' in expression '{expression}'")]
    UnknownVariable { expression: String, name: String },

    #[error("unsupported expression language '{language}'")]
    UnsupportedLanguage { language: String },

    #[error("cannot evaluate '{expression}': {message}")]
    Evaluation { expression: String, message: String },
}

/// Capability that interprets the expression cells of a decision table.
///
/// The engine calls [`evaluate_condition`](Self::evaluate_condition) for every
/// input entry that is not "no test", passing the (already coerced) value of
/// the entry's input clause, and [`evaluate_output`](Self::evaluate_output)
/// for the output entries of matched rules. Implementations must be safe to
/// call concurrently from several evaluations.
pub trait ExpressionEvaluator: Send + Sync {
    /// Whether `condition` accepts `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`] if the condition cannot be evaluated.
    fn evaluate_condition(
        &self,
        condition: &Expression,
        input: &Value,
        ctx: &VariableContext<'_>,
    ) -> Result<bool, ExpressionError>;

    /// The raw value produced by an output entry.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`] if the expression cannot be evaluated.
    fn evaluate_output(
        &self,
        output: &Expression,
        ctx: &VariableContext<'_>,
    ) -> Result<Value, ExpressionError>;
}

impl<T: ExpressionEvaluator + ?Sized> ExpressionEvaluator for Arc<T> {
    fn evaluate_condition(
        &self,
        condition: &Expression,
        input: &Value,
        ctx: &VariableContext<'_>,
    ) -> Result<bool, ExpressionError> {
        (**self).evaluate_condition(condition, input, ctx)
    }

    fn evaluate_output(
        &self,
        output: &Expression,
        ctx: &VariableContext<'_>,
    ) -> Result<Value, ExpressionError> {
        (**self).evaluate_output(output, ctx)
    }
}
