use tracing::{debug, trace};

use crate::resolve::{aggregate, resolve};
use crate::transform::coerce;
use crate::{
    DecisionResult, DecisionTable, EvaluateError, ExpressionEvaluator, InputClause, InputEntry,
    Rule, RuleResult, TransformerFactory, Value, VariableContext, Variables,
};

/// Outcome of one evaluation, before it is shaped into the public result types.
pub(crate) struct Evaluation {
    pub(crate) result: DecisionResult,
    pub(crate) matched: Vec<usize>,
    pub(crate) selected: Vec<usize>,
}

pub(crate) fn evaluate(
    table: &DecisionTable,
    variables: &Variables,
    transformers: &dyn TransformerFactory,
    expressions: &dyn ExpressionEvaluator,
) -> Result<Evaluation, EvaluateError> {
    let ctx = build_context(table.inputs(), variables, transformers)?;
    let matched = match_all(table, &ctx, expressions)?;

    let selected = resolve(table.hit_policy(), table, &matched, |index| {
        evaluate_outputs(&table.rules()[index], &ctx, expressions)
    })?;
    let selected_indices: Vec<usize> = selected.iter().map(|c| c.index).collect();

    let mut results = Vec::with_capacity(selected.len());
    for candidate in selected {
        let rule = &table.rules()[candidate.index];
        let mut entries = Vec::with_capacity(table.outputs().len());
        for (clause, raw) in table.outputs().iter().zip(candidate.outputs) {
            entries.push((clause.name().to_owned(), coerce(clause, raw, transformers)?));
        }
        results.push(RuleResult::new(Some(candidate.index), rule.id.clone(), entries));
    }

    let result = match (table.aggregator(), table.outputs()) {
        (Some(aggregator), [output]) => {
            let column = results
                .into_iter()
                .filter_map(|r| r.get(output.name()).cloned())
                .collect();
            aggregate(aggregator, output.name(), column)?
        }
        _ => DecisionResult::new(results),
    };

    debug!(
        decision = table.id(),
        hit_policy = %table.hit_policy(),
        matched = matched.len(),
        selected = selected_indices.len(),
        "evaluated decision table"
    );

    Ok(Evaluation {
        result,
        matched,
        selected: selected_indices,
    })
}

/// Bind every input clause to its (possibly coerced) value. Missing variables bind as null.
pub(crate) fn build_context<'v>(
    inputs: &[InputClause],
    variables: &'v Variables,
    transformers: &dyn TransformerFactory,
) -> Result<VariableContext<'v>, EvaluateError> {
    let mut ctx = VariableContext::new(variables);
    for clause in inputs {
        let raw = variables.get(clause.name()).cloned().unwrap_or(Value::Null);
        let value = coerce(clause, raw, transformers)?;
        ctx.bind(clause.name(), value);
    }
    Ok(ctx)
}

/// Indices of the rules whose input entries all match, in table order.
pub(crate) fn match_all(
    table: &DecisionTable,
    ctx: &VariableContext<'_>,
    expressions: &dyn ExpressionEvaluator,
) -> Result<Vec<usize>, EvaluateError> {
    let mut matched = Vec::new();
    for (index, rule) in table.rules().iter().enumerate() {
        if rule_matches(rule, table.inputs(), ctx, expressions)? {
            trace!(decision = table.id(), rule = %rule.label(index), "rule matched");
            matched.push(index);
        }
    }
    Ok(matched)
}

fn rule_matches(
    rule: &Rule,
    inputs: &[InputClause],
    ctx: &VariableContext<'_>,
    expressions: &dyn ExpressionEvaluator,
) -> Result<bool, EvaluateError> {
    for (clause, entry) in inputs.iter().zip(&rule.inputs) {
        let hit = match entry {
            InputEntry::Any => true,
            InputEntry::Test(condition) => {
                expressions.evaluate_condition(condition, ctx.input(clause.name()), ctx)?
            }
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate_outputs(
    rule: &Rule,
    ctx: &VariableContext<'_>,
    expressions: &dyn ExpressionEvaluator,
) -> Result<Vec<Value>, EvaluateError> {
    rule.outputs
        .iter()
        .map(|output| expressions.evaluate_output(output, ctx).map_err(Into::into))
        .collect()
}
