use std::collections::HashMap;
use std::fmt;

use super::{DataTypeTransformer, TransformError, TransformerFactory};
use crate::Value;

/// Transformer registry with the built-in types `string`, `boolean`,
/// `integer`, `long` and `double`.
///
/// Additional types can be registered, and built-in ones replaced, with
/// [`register`](Self::register).
pub struct DefaultTransformerFactory {
    transformers: HashMap<String, Box<dyn DataTypeTransformer>>,
}

impl DefaultTransformerFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::empty()
            .register("string", StringTransformer)
            .register("boolean", BooleanTransformer)
            .register("integer", IntegerTransformer)
            .register("long", LongTransformer)
            .register("double", DoubleTransformer)
    }

    /// A registry with no types at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Register `transformer` under `type_name`, replacing any previous entry.
    #[must_use]
    pub fn register(
        mut self,
        type_name: impl Into<String>,
        transformer: impl DataTypeTransformer + 'static,
    ) -> Self {
        self.transformers
            .insert(type_name.into(), Box::new(transformer));
        self
    }

    /// Registered type names, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.transformers.keys().map(String::as_str)
    }
}

impl Default for DefaultTransformerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultTransformerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.type_names().collect();
        names.sort_unstable();
        f.debug_struct("DefaultTransformerFactory")
            .field("types", &names)
            .finish()
    }
}

impl TransformerFactory for DefaultTransformerFactory {
    fn transformer_for(&self, type_name: &str) -> Option<&dyn DataTypeTransformer> {
        self.transformers.get(type_name).map(|t| &**t)
    }
}

fn unsupported(value: &Value, target: &str) -> TransformError {
    TransformError::new(format!("{} value {value} cannot be converted to {target}", value.kind()))
}

struct StringTransformer;

impl DataTypeTransformer for StringTransformer {
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        match value {
            Value::String(_) => Ok(value.clone()),
            Value::Bool(v) => Ok(Value::String(v.to_string())),
            Value::Int(v) => Ok(Value::String(v.to_string())),
            Value::Float(v) => Ok(Value::String(v.to_string())),
            _ => Err(unsupported(value, "string")),
        }
    }
}

struct BooleanTransformer;

impl DataTypeTransformer for BooleanTransformer {
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(unsupported(value, "boolean")),
        }
    }
}

/// Integral view of `value` for the `integer` and `long` types.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_i64(value: &Value, target: &str) -> Result<i64, TransformError> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Float(v) if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 => {
            Ok(*v as i64)
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| TransformError::new(format!("'{s}' is not a valid {target}: {e}"))),
        _ => Err(unsupported(value, target)),
    }
}

struct IntegerTransformer;

impl DataTypeTransformer for IntegerTransformer {
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        let v = to_i64(value, "integer")?;
        i32::try_from(v)
            .map(|i| Value::Int(i64::from(i)))
            .map_err(|_| TransformError::new(format!("{v} is out of range for integer")))
    }
}

struct LongTransformer;

impl DataTypeTransformer for LongTransformer {
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        to_i64(value, "long").map(Value::Int)
    }
}

struct DoubleTransformer;

impl DataTypeTransformer for DoubleTransformer {
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        match value {
            Value::Float(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| TransformError::new(format!("'{s}' is not a valid double: {e}"))),
            _ => value
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| unsupported(value, "double")),
        }
    }
}
