use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Top-level JSON object persisted by a store.
///
/// Keys besides the collection key are carried through rewrites untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// `{ key: [] }`
    pub fn empty(key: &str) -> Self {
        let mut map = Map::new();
        map.insert(key.to_string(), Value::Array(Vec::new()));
        Self(map)
    }

    /// Normalize parsed JSON into a document.
    ///
    /// Objects are used as-is and a bare array becomes `{ key: array }`. Any
    /// other value is handed back so the caller can apply its corruption policy.
    pub fn from_value(value: Value, key: &str) -> Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(items) => {
                let mut map = Map::new();
                map.insert(key.to_string(), Value::Array(items));
                Ok(Self(map))
            }
            other => Err(other),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The collection under `key`, or `None` when it was never initialized.
    pub fn collection(&self, key: &str) -> Result<Option<&Vec<Value>>, ServiceError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(v) if is_unset(v) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(not_an_array(key)),
        }
    }

    pub fn collection_mut(&mut self, key: &str) -> Result<Option<&mut Vec<Value>>, ServiceError> {
        match self.0.get_mut(key) {
            None => Ok(None),
            Some(v) if is_unset(v) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(not_an_array(key)),
        }
    }

    /// The collection under `key`, created empty first if it was never initialized.
    pub fn collection_or_init(&mut self, key: &str) -> Result<&mut Vec<Value>, ServiceError> {
        let slot = self.0.entry(key.to_string()).or_insert(Value::Null);
        if is_unset(slot) {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(items) => Ok(items),
            _ => Err(not_an_array(key)),
        }
    }
}

/// Values that count as "no collection yet": null and the JSON falsy scalars.
fn is_unset(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn not_an_array(key: &str) -> ServiceError {
    ServiceError::Corrupt(format!("`{key}` is not an array"))
}
