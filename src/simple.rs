use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::parse::{
    parse_output, parse_unary_tests, Endpoint, OutputExpr, ParseError, UnaryTest, UnaryTests,
};
use crate::{CompareOp, Expression, ExpressionError, ExpressionEvaluator, Value, VariableContext};

/// Default [`ExpressionEvaluator`] understanding simple unary tests.
///
/// Input entries may be `-`, a literal (equality), a comparison (`< 10`,
/// `>= limit`), a range (`[1..10]`, `]0..1[`), a comma-separated list of those
/// (any may match) or `not(...)`. Output entries are a literal or a variable
/// name. Expressions must carry no language tag or the tag `"simple"`.
///
/// Each distinct entry text is parsed once and the syntax tree is kept for
/// later evaluations. Failed parses are not cached.
#[derive(Debug, Default)]
pub struct SimpleExpressionEvaluator {
    conditions: ParseCache<UnaryTests>,
    outputs: ParseCache<OutputExpr>,
}

impl SimpleExpressionEvaluator {
    pub const LANGUAGE: &'static str = "simple";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct condition and output texts parsed so far.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.conditions.len() + self.outputs.len()
    }

    fn check_language(expr: &Expression) -> Result<(), ExpressionError> {
        match expr.language() {
            None => Ok(()),
            Some(lang) if lang.eq_ignore_ascii_case(Self::LANGUAGE) => Ok(()),
            Some(lang) => Err(ExpressionError::UnsupportedLanguage {
                language: lang.to_owned(),
            }),
        }
    }
}

/// Parsed syntax trees keyed by entry text.
#[derive(Debug)]
struct ParseCache<T> {
    parsed: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> Default for ParseCache<T> {
    fn default() -> Self {
        Self {
            parsed: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> ParseCache<T> {
    fn get_or_parse(
        &self,
        expr: &Expression,
        parse: impl FnOnce(&str) -> Result<T, ParseError>,
    ) -> Result<Arc<T>, ExpressionError> {
        let text = expr.text();
        let cached = self
            .parsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
            .cloned();
        if let Some(tree) = cached {
            return Ok(tree);
        }

        let tree = Arc::new(parse(text).map_err(|source| ExpressionError::Parse {
            expression: text.to_owned(),
            source,
        })?);
        self.parsed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(text.to_owned())
            .or_insert_with(|| Arc::clone(&tree));
        Ok(tree)
    }

    fn len(&self) -> usize {
        self.parsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn resolve<'a>(
    endpoint: &'a Endpoint,
    expr: &Expression,
    ctx: &'a VariableContext<'_>,
) -> Result<&'a Value, ExpressionError> {
    match endpoint {
        Endpoint::Value(v) => Ok(v),
        Endpoint::Name(name) => ctx.get(name).ok_or_else(|| ExpressionError::UnknownVariable {
            expression: expr.text().to_owned(),
            name: name.clone(),
        }),
    }
}

fn test_matches(
    test: &UnaryTest,
    input: &Value,
    expr: &Expression,
    ctx: &VariableContext<'_>,
) -> Result<bool, ExpressionError> {
    match test {
        UnaryTest::Compare { op, endpoint } => {
            let bound = resolve(endpoint, expr, ctx)?;
            Ok(input.compare(*op, bound).unwrap_or(false))
        }
        UnaryTest::Range {
            start,
            start_inclusive,
            end,
            end_inclusive,
        } => {
            let low = resolve(start, expr, ctx)?;
            let high = resolve(end, expr, ctx)?;
            let low_op = if *start_inclusive {
                CompareOp::Gte
            } else {
                CompareOp::Gt
            };
            let high_op = if *end_inclusive {
                CompareOp::Lte
            } else {
                CompareOp::Lt
            };
            Ok(input.compare(low_op, low).unwrap_or(false)
                && input.compare(high_op, high).unwrap_or(false))
        }
    }
}

fn any_matches(
    tests: &[UnaryTest],
    input: &Value,
    expr: &Expression,
    ctx: &VariableContext<'_>,
) -> Result<bool, ExpressionError> {
    for test in tests {
        if test_matches(test, input, expr, ctx)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl ExpressionEvaluator for SimpleExpressionEvaluator {
    fn evaluate_condition(
        &self,
        condition: &Expression,
        input: &Value,
        ctx: &VariableContext<'_>,
    ) -> Result<bool, ExpressionError> {
        Self::check_language(condition)?;
        let tests = self.conditions.get_or_parse(condition, parse_unary_tests)?;
        match tests.as_ref() {
            UnaryTests::Any => Ok(true),
            UnaryTests::Disjunction(tests) => any_matches(tests, input, condition, ctx),
            UnaryTests::Negation(tests) => Ok(!any_matches(tests, input, condition, ctx)?),
        }
    }

    fn evaluate_output(
        &self,
        output: &Expression,
        ctx: &VariableContext<'_>,
    ) -> Result<Value, ExpressionError> {
        Self::check_language(output)?;
        let endpoint = self.outputs.get_or_parse(output, parse_output)?;
        resolve(&endpoint, output, ctx).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variables;

    fn check(condition: &str, input: impl Into<Value>) -> bool {
        let vars = Variables::new().set("limit", 10_i64);
        let ctx = VariableContext::new(&vars);
        SimpleExpressionEvaluator::new()
            .evaluate_condition(&Expression::new(condition), &input.into(), &ctx)
            .unwrap()
    }

    #[test]
    fn no_test_matches_everything() {
        assert!(check("-", 1_i64));
        assert!(check("", Value::Null));
    }

    #[test]
    fn equality() {
        assert!(check("42", 42_i64));
        assert!(check("42", 42.0_f64));
        assert!(!check("42", 21_i64));
        assert!(check(r#""gold""#, "gold"));
        assert!(!check(r#""gold""#, 1_i64));
        assert!(check("true", true));
    }

    #[test]
    fn null_literal_matches_only_null() {
        assert!(check("null", Value::Null));
        assert!(!check("null", 0_i64));
        assert!(!check("42", Value::Null));
    }

    #[test]
    fn comparisons() {
        assert!(check("< 10", 9_i64));
        assert!(!check("< 10", 10_i64));
        assert!(check("<= 10", 10_i64));
        assert!(check("> 2.5", 3_i64));
        assert!(check(">= limit", 10_i64));
        assert!(!check(">= limit", 9_i64));
        assert!(!check("< 10", Value::Null));
        assert!(!check("< 10", "abc"));
    }

    #[test]
    fn ranges() {
        assert!(check("[1..10]", 1_i64));
        assert!(check("[1..10]", 10_i64));
        assert!(!check("]1..10]", 1_i64));
        assert!(!check("[1..10[", 10_i64));
        assert!(check("(1..limit)", 5_i64));
        assert!(!check("[1..10]", Value::Null));
    }

    #[test]
    fn disjunction_and_negation() {
        assert!(check(r#""a", "b""#, "b"));
        assert!(!check(r#""a", "b""#, "c"));
        assert!(check(r#"not("a", "b")"#, "c"));
        assert!(!check("not(< 5)", 3_i64));
    }

    #[test]
    fn unknown_variable_in_condition() {
        let vars = Variables::new();
        let ctx = VariableContext::new(&vars);
        let err = SimpleExpressionEvaluator::new()
            .evaluate_condition(&Expression::new("< missing"), &Value::Int(1), &ctx)
            .unwrap_err();
        assert!(matches!(err, ExpressionError::UnknownVariable { name, .. } if name == "missing"));
    }

    #[test]
    fn parse_failure_is_reported() {
        let vars = Variables::new();
        let ctx = VariableContext::new(&vars);
        let err = SimpleExpressionEvaluator::new()
            .evaluate_condition(&Expression::new("[1.."), &Value::Int(1), &ctx)
            .unwrap_err();
        assert!(matches!(err, ExpressionError::Parse { expression, .. } if expression == "[1.."));
    }

    #[test]
    fn foreign_language_is_rejected() {
        let vars = Variables::new();
        let ctx = VariableContext::new(&vars);
        let expr = Expression::new("x > 1").with_language("juel");
        assert!(matches!(
            SimpleExpressionEvaluator::new().evaluate_output(&expr, &ctx),
            Err(ExpressionError::UnsupportedLanguage { language }) if language == "juel"
        ));
        let tagged = Expression::new("1").with_language("SIMPLE");
        assert_eq!(
            SimpleExpressionEvaluator::new().evaluate_output(&tagged, &ctx).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn outputs() {
        let vars = Variables::new().set("output", 21_i64).set("nothing", Value::Null);
        let ctx = VariableContext::new(&vars);
        let evaluator = SimpleExpressionEvaluator::new();
        let eval = |text: &str| evaluator.evaluate_output(&Expression::new(text), &ctx);
        assert_eq!(eval("output").unwrap(), Value::Int(21));
        assert_eq!(eval("nothing").unwrap(), Value::Null);
        assert_eq!(eval(r#""text""#).unwrap(), Value::from("text"));
        assert_eq!(eval("").unwrap(), Value::Null);
        assert!(matches!(
            eval("missing"),
            Err(ExpressionError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn parsed_entries_are_reused() {
        let vars = Variables::new().set("limit", 10_i64);
        let ctx = VariableContext::new(&vars);
        let evaluator = SimpleExpressionEvaluator::new();
        let condition = Expression::new("[1..limit]");

        assert!(evaluator.evaluate_condition(&condition, &Value::Int(3), &ctx).unwrap());
        assert!(!evaluator.evaluate_condition(&condition, &Value::Int(11), &ctx).unwrap());
        assert_eq!(evaluator.cached_entries(), 1);

        assert_eq!(
            evaluator.evaluate_output(&Expression::new("limit"), &ctx).unwrap(),
            Value::Int(10)
        );
        assert_eq!(
            evaluator.evaluate_output(&Expression::new("limit"), &ctx).unwrap(),
            Value::Int(10)
        );
        assert_eq!(evaluator.cached_entries(), 2);
    }

    #[test]
    fn failed_parses_are_not_cached() {
        let vars = Variables::new();
        let ctx = VariableContext::new(&vars);
        let evaluator = SimpleExpressionEvaluator::new();
        let broken = Expression::new("[1..");
        for _ in 0..2 {
            assert!(matches!(
                evaluator.evaluate_condition(&broken, &Value::Int(1), &ctx),
                Err(ExpressionError::Parse { .. })
            ));
        }
        assert_eq!(evaluator.cached_entries(), 0);
    }

    #[test]
    fn evaluator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimpleExpressionEvaluator>();
    }
}
