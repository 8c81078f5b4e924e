use std::cmp::Ordering;

use crate::{
    Aggregator, DecisionResult, DecisionTable, EvaluateError, HitPolicy, OutputClause,
    RuleResult, Value,
};

/// A matched rule together with its raw (not yet coerced) output values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) index: usize,
    pub(crate) outputs: Vec<Value>,
}

/// Reduce the matched rules of `table` to the rules selected by `policy`.
///
/// `matched` holds rule indices in table order. Raw output values are pulled
/// through `outputs_of` only for the rules the policy has to look at: single
/// hit policies that decide by position never evaluate the outputs of rules
/// they discard.
pub(crate) fn resolve<F>(
    policy: HitPolicy,
    table: &DecisionTable,
    matched: &[usize],
    mut outputs_of: F,
) -> Result<Vec<Candidate>, EvaluateError>
where
    F: FnMut(usize) -> Result<Vec<Value>, EvaluateError>,
{
    let mut candidate = |index: usize| -> Result<Candidate, EvaluateError> {
        Ok(Candidate {
            index,
            outputs: outputs_of(index)?,
        })
    };

    match policy {
        HitPolicy::Unique => match matched {
            [] => Err(EvaluateError::NoMatch),
            [only] => Ok(vec![candidate(*only)?]),
            many => Err(EvaluateError::MultipleMatches {
                policy,
                rules: many
                    .iter()
                    .map(|&i| table.rules()[i].label(i))
                    .collect(),
            }),
        },
        HitPolicy::First => match matched.first() {
            Some(&first) => Ok(vec![candidate(first)?]),
            None => Ok(Vec::new()),
        },
        HitPolicy::Collect | HitPolicy::RuleOrder => {
            matched.iter().map(|&i| candidate(i)).collect()
        }
        HitPolicy::Any => {
            let all: Vec<Candidate> = matched
                .iter()
                .map(|&i| candidate(i))
                .collect::<Result<_, _>>()?;
            if let Some((first, rest)) = all.split_first() {
                if let Some(other) = rest.iter().find(|c| c.outputs != first.outputs) {
                    return Err(EvaluateError::ConflictingOutputs {
                        first: table.rules()[first.index].label(first.index),
                        second: table.rules()[other.index].label(other.index),
                    });
                }
            }
            Ok(all.into_iter().take(1).collect())
        }
        HitPolicy::Priority => {
            let ranked = by_priority(table.outputs(), matched, &mut candidate)?;
            Ok(ranked.into_iter().take(1).collect())
        }
        HitPolicy::OutputOrder => by_priority(table.outputs(), matched, &mut candidate),
    }
}

/// All matched rules stably sorted by output priority, so equal ranks keep table order.
fn by_priority<F>(
    clauses: &[OutputClause],
    matched: &[usize],
    candidate: &mut F,
) -> Result<Vec<Candidate>, EvaluateError>
where
    F: FnMut(usize) -> Result<Candidate, EvaluateError>,
{
    let mut ranked = matched
        .iter()
        .map(|&i| {
            let c = candidate(i)?;
            Ok((rank(clauses, &c.outputs), c))
        })
        .collect::<Result<Vec<(Vec<usize>, Candidate)>, EvaluateError>>()?;
    ranked.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(ranked.into_iter().map(|(_, c)| c).collect())
}

/// Priority key of a rule: the position of each output value in its clause's
/// output value list, compared clause by clause.
fn rank(clauses: &[OutputClause], outputs: &[Value]) -> Vec<usize> {
    clauses
        .iter()
        .zip(outputs)
        .map(|(clause, value)| clause.priority_of(value))
        .collect()
}

/// Fold the single output column of a COLLECT table.
///
/// COUNT counts every selected rule. SUM, MIN and MAX skip nulls and produce
/// an empty result when no value is left.
pub(crate) fn aggregate(
    aggregator: Aggregator,
    output: &str,
    values: Vec<Value>,
) -> Result<DecisionResult, EvaluateError> {
    let folded = match aggregator {
        Aggregator::Count => Some(Value::Int(i64::try_from(values.len()).unwrap_or(i64::MAX))),
        Aggregator::Sum | Aggregator::Min | Aggregator::Max => {
            let numbers: Vec<Value> = values.into_iter().filter(|v| !v.is_null()).collect();
            if let Some(bad) = numbers.iter().find(|v| v.as_f64().is_none()) {
                return Err(EvaluateError::NonNumericAggregation {
                    aggregator,
                    value: bad.clone(),
                });
            }
            match aggregator {
                Aggregator::Sum if !numbers.is_empty() => Some(sum(&numbers)),
                Aggregator::Min => numbers.into_iter().min_by(numeric_order),
                Aggregator::Max => numbers.into_iter().max_by(numeric_order),
                _ => None,
            }
        }
    };

    Ok(match folded {
        Some(value) => DecisionResult::new(vec![RuleResult::new(
            None,
            None,
            vec![(output.to_owned(), value)],
        )]),
        None => DecisionResult::default(),
    })
}

fn numeric_order(a: &Value, b: &Value) -> Ordering {
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);
    a.total_cmp(&b)
}

/// Integer sum while every value is an `Int` and the sum fits; float sum otherwise.
fn sum(values: &[Value]) -> Value {
    let ints: Option<i64> = values.iter().try_fold(0_i64, |acc, v| match v {
        Value::Int(i) => acc.checked_add(*i),
        _ => None,
    });
    match ints {
        Some(total) => Value::Int(total),
        None => Value::Float(values.iter().filter_map(Value::as_f64).sum()),
    }
}
