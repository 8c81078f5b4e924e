use std::collections::HashSet;

use crate::types::{Clause, ClauseRole};
use crate::{DecisionTable, HitPolicy, TableError};

pub(crate) fn validate(table: &DecisionTable) -> Result<(), TableError> {
    check_duplicates(table.inputs())?;
    check_duplicates(table.outputs())?;
    if table.outputs().is_empty() {
        return Err(TableError::NoOutputs);
    }
    check_arity(table)?;
    check_aggregator(table)
}

fn check_duplicates<R: ClauseRole>(clauses: &[Clause<R>]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for clause in clauses {
        if !seen.insert(clause.name()) {
            return Err(TableError::DuplicateClause {
                kind: R::KIND,
                name: clause.name().to_owned(),
            });
        }
    }
    Ok(())
}

fn check_arity(table: &DecisionTable) -> Result<(), TableError> {
    let inputs = table.inputs().len();
    let outputs = table.outputs().len();
    for (index, rule) in table.rules().iter().enumerate() {
        if rule.inputs.len() != inputs {
            return Err(TableError::InputArity {
                rule: rule.label(index),
                expected: inputs,
                found: rule.inputs.len(),
            });
        }
        if rule.outputs.len() != outputs {
            return Err(TableError::OutputArity {
                rule: rule.label(index),
                expected: outputs,
                found: rule.outputs.len(),
            });
        }
    }
    Ok(())
}

fn check_aggregator(table: &DecisionTable) -> Result<(), TableError> {
    let Some(aggregator) = table.aggregator() else {
        return Ok(());
    };
    if table.hit_policy() != HitPolicy::Collect {
        return Err(TableError::AggregatorRequiresCollect {
            aggregator,
            policy: table.hit_policy(),
        });
    }
    if table.outputs().len() != 1 {
        return Err(TableError::AggregatorRequiresSingleOutput {
            aggregator,
            outputs: table.outputs().len(),
        });
    }
    Ok(())
}
