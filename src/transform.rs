//! User transforms applied while reading.
//!
//! The calling convention depends on the parser family, mirroring each format's native hook:
//!
//! | parser                         | transform                 | called                       |
//! |--------------------------------|---------------------------|------------------------------|
//! | delimited (csv/tsv/psv/custom) | [`Transform::Row`]        | once per row, during parsing |
//! | JSON (json/geojson/topojson)   | [`Transform::Reviver`]    | once per key, bottom-up      |
//! | everything else                | [`Transform::Value`]      | once, on the parsed value    |
//!
//! Pairing a transform with a parser of another family is a configuration error rather than
//! being silently adapted.

use std::fmt;
use std::sync::Arc;

use crate::error::TransformError;
use crate::types::{Row, Value};

/// Per-row callback: `(row, index, columns)`. Returning [`Value::Null`] drops the row.
pub type RowFn = dyn Fn(Row, usize, &[String]) -> Result<Value, TransformError> + Send + Sync;

/// JSON reviver: `(key, value)`. Array elements get their index as key, the root gets `""`.
pub type ReviverFn = dyn Fn(&str, Value) -> Result<Value, TransformError> + Send + Sync;

/// Whole-value transform.
pub type ValueFn = dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync;

/// A transform hook, tagged by the parser family it applies to.
#[derive(Clone)]
pub enum Transform {
    Row(Arc<RowFn>),
    Reviver(Arc<ReviverFn>),
    Value(Arc<ValueFn>),
}

impl Transform {
    /// Build a [`Transform::Row`].
    pub fn row<F>(f: F) -> Self
    where
        F: Fn(Row, usize, &[String]) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self::Row(Arc::new(f))
    }

    /// Build a [`Transform::Reviver`].
    pub fn reviver<F>(f: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self::Reviver(Arc::new(f))
    }

    /// Build a [`Transform::Value`].
    pub fn value<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self::Value(Arc::new(f))
    }

    /// Short name of the calling convention, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Row(_) => "row",
            Self::Reviver(_) => "reviver",
            Self::Value(_) => "value",
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform::{}", self.kind())
    }
}
