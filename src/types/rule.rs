use std::fmt;

/// Expression text handed to an [`ExpressionEvaluator`](crate::ExpressionEvaluator).
///
/// The table never interprets the text itself; the optional language tag lets
/// an evaluator reject expressions written for a different dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    text: String,
    language: Option<String>,
}

impl Expression {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::new(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Expression::new(text)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One cell of a rule's input side.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEntry {
    /// The "no test" entry; matches any value, including null.
    Any,
    /// A condition evaluated against the clause's value.
    Test(Expression),
}

impl fmt::Display for InputEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEntry::Any => write!(f, "-"),
            InputEntry::Test(expr) => write!(f, "{expr}"),
        }
    }
}

/// One row of a decision table.
///
/// Entries are positional: `inputs[i]` tests input clause `i` and `outputs[j]`
/// produces output clause `j`. Rules are created through
/// [`DecisionTableBuilder::rule()`](super::DecisionTableBuilder::rule).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub(crate) id: Option<String>,
    pub(crate) inputs: Vec<InputEntry>,
    pub(crate) outputs: Vec<Expression>,
}

impl Rule {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn inputs(&self) -> &[InputEntry] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Expression] {
        &self.outputs
    }

    /// The rule id if one was given, otherwise its 1-based row number.
    #[must_use]
    pub(crate) fn label(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("#{}", index + 1),
        }
    }
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<String>,
    inputs: Vec<InputEntry>,
    outputs: Vec<Expression>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append a condition for the next input clause.
    #[must_use]
    pub fn when(mut self, condition: impl Into<Expression>) -> Self {
        self.inputs.push(InputEntry::Test(condition.into()));
        self
    }

    /// Append a "no test" entry for the next input clause.
    #[must_use]
    pub fn any(mut self) -> Self {
        self.inputs.push(InputEntry::Any);
        self
    }

    /// Append the output expression for the next output clause.
    #[must_use]
    pub fn then(mut self, output: impl Into<Expression>) -> Self {
        self.outputs.push(output.into());
        self
    }

    pub(crate) fn build(self) -> Rule {
        Rule {
            id: self.id,
            inputs: self.inputs,
            outputs: self.outputs,
        }
    }
}
