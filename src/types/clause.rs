use std::fmt;
use std::marker::PhantomData;

use super::value::Value;

/// Whether a clause is tested by rules or produced by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClauseKind {
    Input,
    Output,
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseKind::Input => write!(f, "input"),
            ClauseKind::Output => write!(f, "output"),
        }
    }
}

/// Role marker for [`Clause`]. Implemented by [`Input`] and [`Output`] only.
pub trait ClauseRole: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    const KIND: ClauseKind;
}

/// Marker for input clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Input;

/// Marker for output clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output;

impl ClauseRole for Input {
    const KIND: ClauseKind = ClauseKind::Input;
}

impl ClauseRole for Output {
    const KIND: ClauseKind = ClauseKind::Output;
}

/// A named column of a decision table.
///
/// Input and output clauses share this type and differ only in their role
/// marker, so the coercion contract is written once for both. A clause may
/// declare a type name (e.g. `"integer"`); the name is opaque to the table and
/// resolved through a [`TransformerFactory`](crate::TransformerFactory) at
/// evaluation time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause<R: ClauseRole> {
    name: String,
    type_ref: Option<String>,
    values: Vec<Value>,
    #[cfg_attr(feature = "serde", serde(skip))]
    role: PhantomData<R>,
}

pub type InputClause = Clause<Input>;
pub type OutputClause = Clause<Output>;

impl<R: ClauseRole> Clause<R> {
    /// An untyped clause. Values bound to it are never coerced.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
            values: Vec::new(),
            role: PhantomData,
        }
    }

    /// A clause declaring the type name `type_ref`.
    #[must_use]
    pub fn typed(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            type_ref: Some(type_ref.into()),
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_ref(&self) -> Option<&str> {
        self.type_ref.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> ClauseKind {
        R::KIND
    }
}

impl Clause<Output> {
    /// Declare the ordered list of output values for this clause. Earlier
    /// entries have higher priority under the PRIORITY and OUTPUT_ORDER hit
    /// policies.
    #[must_use]
    pub fn with_output_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn output_values(&self) -> &[Value] {
        &self.values
    }

    /// Rank of `value` in the output value list; lower is higher priority.
    /// Values not in the list (or clauses without one) rank after every listed value.
    pub(crate) fn priority_of(&self, value: &Value) -> usize {
        self.values
            .iter()
            .position(|v| v == value)
            .unwrap_or(self.values.len())
    }
}

impl<R: ClauseRole> fmt::Display for Clause<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_ref {
            Some(t) => write!(f, "{} {}: {}", R::KIND, self.name, t),
            None => write!(f, "{} {}", R::KIND, self.name),
        }
    }
}
