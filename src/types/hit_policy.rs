use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Strategy for reducing the matched rules of a table to its result.
///
/// The policy only governs aggregation; every rule is matched the same way
/// regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitPolicy {
    /// Exactly one rule must match.
    #[default]
    Unique,
    /// Any number of rules may match if they all produce the same output.
    Any,
    /// The first matching rule in table order wins.
    First,
    /// The matching rule with the highest output priority wins.
    Priority,
    /// All matching rules in table order, optionally aggregated.
    Collect,
    /// All matching rules in table order.
    RuleOrder,
    /// All matching rules sorted by output priority.
    OutputOrder,
}

impl HitPolicy {
    /// Whether the policy can select more than one rule.
    #[must_use]
    pub fn is_multi_result(self) -> bool {
        matches!(
            self,
            HitPolicy::Collect | HitPolicy::RuleOrder | HitPolicy::OutputOrder
        )
    }
}

impl fmt::Display for HitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HitPolicy::Unique => "UNIQUE",
            HitPolicy::Any => "ANY",
            HitPolicy::First => "FIRST",
            HitPolicy::Priority => "PRIORITY",
            HitPolicy::Collect => "COLLECT",
            HitPolicy::RuleOrder => "RULE ORDER",
            HitPolicy::OutputOrder => "OUTPUT ORDER",
        };
        f.write_str(name)
    }
}

/// Returned when a hit policy or aggregator name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {what} '{name}'")]
pub struct UnknownNameError {
    what: &'static str,
    name: String,
}

/// Normalize `"rule order"`, `"RULE_ORDER"` and `"Rule-Order"` to `"RULE_ORDER"`.
fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for HitPolicy {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "UNIQUE" => Ok(HitPolicy::Unique),
            "ANY" => Ok(HitPolicy::Any),
            "FIRST" => Ok(HitPolicy::First),
            "PRIORITY" => Ok(HitPolicy::Priority),
            "COLLECT" => Ok(HitPolicy::Collect),
            "RULE_ORDER" => Ok(HitPolicy::RuleOrder),
            "OUTPUT_ORDER" => Ok(HitPolicy::OutputOrder),
            _ => Err(UnknownNameError {
                what: "hit policy",
                name: s.to_owned(),
            }),
        }
    }
}

/// Aggregation applied to the single output column of a COLLECT table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregator {
    Sum,
    Min,
    Max,
    Count,
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregator::Sum => "SUM",
            Aggregator::Min => "MIN",
            Aggregator::Max => "MAX",
            Aggregator::Count => "COUNT",
        };
        f.write_str(name)
    }
}

impl FromStr for Aggregator {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "SUM" => Ok(Aggregator::Sum),
            "MIN" => Ok(Aggregator::Min),
            "MAX" => Ok(Aggregator::Max),
            "COUNT" => Ok(Aggregator::Count),
            _ => Err(UnknownNameError {
                what: "aggregator",
                name: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_unique() {
        assert_eq!(HitPolicy::default(), HitPolicy::Unique);
    }

    #[test]
    fn parse_policy_names() {
        assert_eq!("UNIQUE".parse(), Ok(HitPolicy::Unique));
        assert_eq!("first".parse(), Ok(HitPolicy::First));
        assert_eq!("RULE ORDER".parse(), Ok(HitPolicy::RuleOrder));
        assert_eq!("rule_order".parse(), Ok(HitPolicy::RuleOrder));
        assert_eq!(" Output-Order ".parse(), Ok(HitPolicy::OutputOrder));
    }

    #[test]
    fn parse_unknown_policy() {
        let err = "SOMETIMES".parse::<HitPolicy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown hit policy 'SOMETIMES'");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for policy in [
            HitPolicy::Unique,
            HitPolicy::Any,
            HitPolicy::First,
            HitPolicy::Priority,
            HitPolicy::Collect,
            HitPolicy::RuleOrder,
            HitPolicy::OutputOrder,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn parse_aggregator() {
        assert_eq!("sum".parse(), Ok(Aggregator::Sum));
        assert_eq!("COUNT".parse(), Ok(Aggregator::Count));
        assert_eq!(
            "avg".parse::<Aggregator>().unwrap_err().to_string(),
            "unknown aggregator 'avg'"
        );
    }

    #[test]
    fn multi_result_policies() {
        assert!(HitPolicy::Collect.is_multi_result());
        assert!(HitPolicy::OutputOrder.is_multi_result());
        assert!(!HitPolicy::First.is_multi_result());
    }
}
