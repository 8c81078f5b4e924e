use crate::{CompareOp, Value};

/// Operand of a unary test: a literal or the name of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Value(Value),
    Name(String),
}

/// A single test against the implicit input value.
#[derive(Debug, Clone, PartialEq)]
pub enum UnaryTest {
    /// `< 10`, `>= limit`, or a bare literal meaning equality.
    Compare { op: CompareOp, endpoint: Endpoint },
    /// `[1..10]`, `]0..1[`, `(a..b]`.
    Range {
        start: Endpoint,
        start_inclusive: bool,
        end: Endpoint,
        end_inclusive: bool,
    },
}

/// A parsed input entry.
#[derive(Debug, Clone, PartialEq)]
pub enum UnaryTests {
    /// `-` or an empty entry.
    Any,
    /// Comma-separated tests; matches if any test matches.
    Disjunction(Vec<UnaryTest>),
    /// `not(...)`; matches if no inner test matches.
    Negation(Vec<UnaryTest>),
}

/// A parsed output entry. An empty entry is a null literal.
pub type OutputExpr = Endpoint;
