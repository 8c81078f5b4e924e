use std::collections::HashMap;

use super::Value;

/// The raw input variables of one evaluation, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    data: HashMap<String, Value>,
}

impl Variables {
    /// Create an empty variable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value under the same name.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Insert a variable (mutable reference version).
    pub fn insert(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-evaluation view that conditions and output expressions are evaluated
/// against.
///
/// Holds one binding per input clause (the possibly coerced clause value)
/// layered over the raw [`Variables`]. Bindings shadow raw variables of the
/// same name, so a rule condition always observes the coerced value.
#[derive(Debug, Clone)]
pub struct VariableContext<'v> {
    bindings: HashMap<String, Value>,
    variables: &'v Variables,
}

impl<'v> VariableContext<'v> {
    pub(crate) fn new(variables: &'v Variables) -> Self {
        Self {
            bindings: HashMap::new(),
            variables,
        }
    }

    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_owned(), value);
    }

    /// Look up a name: clause bindings first, then raw variables.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .get(name)
            .or_else(|| self.variables.get(name))
    }

    /// The value bound to an input clause. Unbound clauses read as `Null`.
    #[must_use]
    pub fn input(&self, clause: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.bindings.get(clause).unwrap_or(NULL)
    }

    /// The clause bindings, in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The raw variables this context was built from.
    #[must_use]
    pub fn variables(&self) -> &'v Variables {
        self.variables
    }
}
