//! Status snapshot data.
//!
//! A snapshot is whatever JSON the server decided to send for `"/status"`.
//! The shape is server-defined and deliberately kept opaque here: nothing
//! validates it, and every accessor is tolerant, returning `None` for
//! anything absent or differently shaped. A snapshot is created per inbound
//! frame, rendered once, then dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One status snapshot as received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusSnapshot(Value);

impl StatusSnapshot {
    /// Wraps a parsed JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns true if the snapshot is a JSON object.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Returns a top-level section by key, if the snapshot is an object
    /// carrying that key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    /// Iterates top-level sections. Empty for non-object snapshots.
    pub fn sections(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.as_object().into_iter().flatten()
    }
}

impl From<Value> for StatusSnapshot {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
