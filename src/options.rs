//! Per-registration options.
//!
//! No option key is interpreted by the registry today. The object is kept so
//! callers can attach configuration to a breakpoint and so registry-wide
//! defaults can be layered underneath it.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::BreakpointError;

/// A JSON object of options, merged with [`Options::merge`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from anything that serializes to a JSON object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, BreakpointError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(BreakpointError::OptionsNotAnObject(kind(&other))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested value by a `/`-separated key path, e.g.
    /// `"layout/columns"`. Keys are taken literally; there is no leading `/`
    /// and no escaping.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('/');
        let first = self.0.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.as_object()?.get(part))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Deep-merge `other` into `self`.
    ///
    /// Keys present on both sides whose values are both objects are merged
    /// key by key. Any other value from `other` replaces the one in `self`,
    /// arrays and `null` included.
    pub fn merge(&mut self, other: &Options) {
        merge_maps(&mut self.0, &other.0);
    }

    /// `self` layered under `other`, as a new object.
    pub fn merged(mut self, other: &Options) -> Self {
        self.merge(other);
        self
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        Value::Object(options.0)
    }
}

fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
