use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    DecisionResult, DecisionTable, DefaultTransformerFactory, EvaluateError, EvaluationReport,
    ExpressionEvaluator, SimpleExpressionEvaluator, TransformerFactory, Variables,
};

/// Evaluates [`DecisionTable`]s against sets of [`Variables`].
///
/// The engine owns the collaborators evaluation needs: a [`TransformerFactory`]
/// for typed clauses and an [`ExpressionEvaluator`] for rule entries. It holds
/// no per-evaluation state, so one engine can be shared across threads and
/// used with any number of tables.
///
/// ```
/// use dectable::{DecisionEngine, DecisionTableBuilder, InputClause, OutputClause, Value, Variables};
///
/// let table = DecisionTableBuilder::new("discount")
///     .input(InputClause::typed("age", "integer"))
///     .output(OutputClause::typed("rate", "double"))
///     .rule(|r| r.when("< 18").then("0.5"))
///     .rule(|r| r.when(">= 18").then("0"))
///     .build()
///     .unwrap();
///
/// let engine = DecisionEngine::new();
/// let result = engine
///     .evaluate(&table, &Variables::new().set("age", "12"))
///     .unwrap();
/// assert_eq!(result.single_entry().unwrap(), Some(&Value::Float(0.5)));
/// ```
#[derive(Clone)]
pub struct DecisionEngine {
    transformers: Arc<dyn TransformerFactory>,
    expressions: Arc<dyn ExpressionEvaluator>,
}

impl DecisionEngine {
    /// An engine with the built-in transformers and the simple expression evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> DecisionEngineBuilder {
        DecisionEngineBuilder::default()
    }

    /// Evaluate `table` against `variables`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError`] if a value cannot be coerced to its clause's
    /// type, an entry fails to evaluate, or the hit policy rejects the set of
    /// matching rules.
    pub fn evaluate(
        &self,
        table: &DecisionTable,
        variables: &Variables,
    ) -> Result<DecisionResult, EvaluateError> {
        crate::evaluate::evaluate(
            table,
            variables,
            self.transformers.as_ref(),
            self.expressions.as_ref(),
        )
        .map(|evaluation| evaluation.result)
    }

    /// Like [`evaluate()`](Self::evaluate), but also reports which rules
    /// matched, which were selected, and how long evaluation took.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate()`](Self::evaluate).
    pub fn evaluate_detailed(
        &self,
        table: &DecisionTable,
        variables: &Variables,
    ) -> Result<EvaluationReport, EvaluateError> {
        let start = Instant::now();
        let evaluation = crate::evaluate::evaluate(
            table,
            variables,
            self.transformers.as_ref(),
            self.expressions.as_ref(),
        )?;
        Ok(EvaluationReport::new(
            evaluation.result,
            evaluation.matched,
            evaluation.selected,
            start.elapsed(),
        ))
    }

    pub fn transformer_factory(&self) -> &dyn TransformerFactory {
        self.transformers.as_ref()
    }

    pub fn expression_evaluator(&self) -> &dyn ExpressionEvaluator {
        self.expressions.as_ref()
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngine").finish_non_exhaustive()
    }
}

/// Builder for [`DecisionEngine`]. Unset collaborators fall back to the defaults.
#[derive(Default)]
pub struct DecisionEngineBuilder {
    transformers: Option<Arc<dyn TransformerFactory>>,
    expressions: Option<Arc<dyn ExpressionEvaluator>>,
}

impl DecisionEngineBuilder {
    #[must_use]
    pub fn transformer_factory(mut self, factory: impl TransformerFactory + 'static) -> Self {
        self.transformers = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn expression_evaluator(mut self, evaluator: impl ExpressionEvaluator + 'static) -> Self {
        self.expressions = Some(Arc::new(evaluator));
        self
    }

    #[must_use]
    pub fn build(self) -> DecisionEngine {
        let transformers: Arc<dyn TransformerFactory> = match self.transformers {
            Some(factory) => factory,
            None => Arc::new(DefaultTransformerFactory::new()),
        };
        let expressions: Arc<dyn ExpressionEvaluator> = match self.expressions {
            Some(evaluator) => evaluator,
            None => Arc::new(SimpleExpressionEvaluator::new()),
        };
        DecisionEngine {
            transformers,
            expressions,
        }
    }
}

impl fmt::Debug for DecisionEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngineBuilder")
            .field("custom_transformers", &self.transformers.is_some())
            .field("custom_expressions", &self.expressions.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecisionTableBuilder, HitPolicy, InputClause, OutputClause, TransformError, Value};

    fn table() -> DecisionTable {
        DecisionTableBuilder::new("shipping")
            .input(InputClause::typed("weight", "double"))
            .output(OutputClause::new("carrier"))
            .hit_policy(HitPolicy::First)
            .rule(|r| r.id("light").when("< 1").then("\"post\""))
            .rule(|r| r.id("heavy").any().then("\"freight\""))
            .build()
            .unwrap()
    }

    #[test]
    fn default_engine_evaluates() {
        let engine = DecisionEngine::default();
        let result = engine
            .evaluate(&table(), &Variables::new().set("weight", "0.4"))
            .unwrap();
        assert_eq!(result.single_entry(), Ok(Some(&Value::from("post"))));
        assert_eq!(result.first_result().unwrap().rule_id(), Some("light"));
    }

    #[test]
    fn detailed_report() {
        let report = DecisionEngine::new()
            .evaluate_detailed(&table(), &Variables::new().set("weight", 3_i64))
            .unwrap();
        assert_eq!(report.matched(), &[1]);
        assert_eq!(report.selected(), &[1]);
        assert_eq!(
            report.result().single_entry(),
            Ok(Some(&Value::from("freight")))
        );
    }

    #[test]
    fn custom_transformer_factory() {
        fn reject(_: &Value) -> Result<Value, TransformError> {
            Err(TransformError::new("no doubles today"))
        }
        let factory = DefaultTransformerFactory::empty().register("double", reject);
        let engine = DecisionEngine::builder()
            .transformer_factory(factory)
            .build();
        let err = engine
            .evaluate(&table(), &Variables::new().set("weight", 1_i64))
            .unwrap_err();
        assert!(matches!(err, EvaluateError::Coercion { clause, .. } if clause == "weight"));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecisionEngine>();
    }

    #[test]
    fn debug_output() {
        let builder = DecisionEngine::builder().expression_evaluator(SimpleExpressionEvaluator::new());
        let dbg = format!("{builder:?}");
        assert!(dbg.contains("custom_expressions: true"));
        assert!(dbg.contains("custom_transformers: false"));
        assert!(format!("{:?}", builder.build()).starts_with("DecisionEngine"));
    }
}
