mod clause;
mod context;
mod error;
mod evaluation_report;
mod hit_policy;
mod result;
mod rule;
mod table;
mod value;

pub use clause::{Clause, ClauseKind, ClauseRole, Input, InputClause, Output, OutputClause};
pub use context::{VariableContext, Variables};
pub use error::TableError;
pub use evaluation_report::EvaluationReport;
pub use hit_policy::{Aggregator, HitPolicy, UnknownNameError};
pub use result::{DecisionResult, ResultError, RuleResult};
pub use rule::{Expression, InputEntry, Rule, RuleBuilder};
pub use table::{DecisionTable, DecisionTableBuilder};
pub use value::{CompareOp, Value};
