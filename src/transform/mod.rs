//! Type coercion of clause values.
//!
//! A clause may declare a type name. At evaluation time the name is resolved
//! through a [`TransformerFactory`] to a [`DataTypeTransformer`] which converts
//! the bound value into the declared representation.

mod builtin;

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

pub use builtin::DefaultTransformerFactory;

use crate::types::{Clause, ClauseRole};
use crate::{EvaluateError, Value};

/// Returned by a [`DataTypeTransformer`] that cannot convert a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts a non-null value into the representation of one declared type.
pub trait DataTypeTransformer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TransformError`] if `value` cannot be represented in the target type.
    fn transform(&self, value: &Value) -> Result<Value, TransformError>;
}

impl<F> DataTypeTransformer for F
where
    F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync,
{
    fn transform(&self, value: &Value) -> Result<Value, TransformError> {
        self(value)
    }
}

/// Resolves declared type names to transformers. Supplied by the embedder.
///
/// The engine resolves the type name on every coercion; implementations are
/// free to cache internally.
pub trait TransformerFactory: Send + Sync {
    /// The transformer for `type_name`, or `None` if the type is unknown.
    fn transformer_for(&self, type_name: &str) -> Option<&dyn DataTypeTransformer>;
}

impl<T: TransformerFactory + ?Sized> TransformerFactory for Arc<T> {
    fn transformer_for(&self, type_name: &str) -> Option<&dyn DataTypeTransformer> {
        (**self).transformer_for(type_name)
    }
}

/// Coerce `raw` to the declared type of `clause`.
///
/// Untyped clauses and null values are returned unchanged without touching
/// the factory. Otherwise the factory is consulted exactly once and the
/// resolved transformer invoked exactly once.
///
/// # Errors
///
/// Returns [`EvaluateError::UnknownType`] if the factory has no transformer
/// for the declared type and [`EvaluateError::Coercion`] if the transformer
/// rejects the value.
pub fn coerce<R: ClauseRole>(
    clause: &Clause<R>,
    raw: Value,
    factory: &dyn TransformerFactory,
) -> Result<Value, EvaluateError> {
    let Some(type_name) = clause.type_ref() else {
        return Ok(raw);
    };
    if raw.is_null() {
        return Ok(raw);
    }

    let transformer =
        factory
            .transformer_for(type_name)
            .ok_or_else(|| EvaluateError::UnknownType {
                clause: clause.name().to_owned(),
                kind: R::KIND,
                type_name: type_name.to_owned(),
            })?;

    trace!(clause = clause.name(), kind = %R::KIND, type_name, "coercing value");

    transformer
        .transform(&raw)
        .map_err(|source| EvaluateError::Coercion {
            clause: clause.name().to_owned(),
            kind: R::KIND,
            type_name: type_name.to_owned(),
            value: raw,
            source,
        })
}
