//! Policy identifiers.
//!
//! The REST API hands out numeric policy ids, NerdGraph hands out strings, and
//! workflow predicates carry either. Every join compares the normalized string
//! form, so `123` and `"123"` name the same policy.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// String-normalized alert policy id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Coerce an arbitrary JSON scalar into a policy id.
    ///
    /// Returns `None` for null, empty strings, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => Self(n.to_string()),
            Value::Bool(b) => Self(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        (!id.0.is_empty()).then_some(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for PolicyId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PolicyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for PolicyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a string or numeric policy id, got {value}"))
        })
    }
}
