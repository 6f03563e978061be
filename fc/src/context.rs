//! Chain context
//!
//! The named values available for template substitution during one chain
//! run. Values are arbitrary JSON so nested structures can be addressed
//! with dotted paths (`{{config.retries}}`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping of names to JSON values, supplied once per chain invocation
///
/// Immutable during a single model's run; parallel fusion clones one per
/// model task so runs never share state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainContext(Map<String, Value>);

impl ChainContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous entry for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert for literal contexts in tests and call sites
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a dotted path, descending key-by-key into nested objects
    ///
    /// Returns `None` as soon as any segment is absent or the current value
    /// is not an object.
    pub fn lookup_path(&self, dotted: &str) -> Option<&Value> {
        let mut segments = dotted.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for ChainContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ChainContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Truthiness test for conditional-fragment guards
///
/// Follows the narrow rules of the template grammar: null, false, empty
/// strings, numeric zero, and empty collections are falsy; everything else
/// is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
