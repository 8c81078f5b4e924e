use std::fmt;
use std::time::Duration;

use super::result::DecisionResult;

/// Detailed evaluation report returned by
/// [`DecisionEngine::evaluate_detailed()`](crate::DecisionEngine::evaluate_detailed).
///
/// Contains the result, which rules matched, which of those the hit policy
/// selected, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: DecisionResult,
    matched: Vec<usize>,
    selected: Vec<usize>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        result: DecisionResult,
        matched: Vec<usize>,
        selected: Vec<usize>,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            matched,
            selected,
            duration,
        }
    }

    /// The decision result, same as [`DecisionEngine::evaluate()`](crate::DecisionEngine::evaluate).
    pub fn result(&self) -> &DecisionResult {
        &self.result
    }

    pub fn into_result(self) -> DecisionResult {
        self.result
    }

    /// Zero-based indices of every matching rule, in table order.
    #[must_use]
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Indices of the rules the hit policy selected, in result order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |indices: &[usize]| {
            indices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "result: {}", self.result)?;
        write!(f, ", matched: [{}]", join(&self.matched))?;
        write!(f, ", selected: [{}]", join(&self.selected))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
