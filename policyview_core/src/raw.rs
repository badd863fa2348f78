use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::nav::{lookup, Segment};

/// A backend policy record, kept exactly as received.
///
/// The tree sits behind an `Arc` and is only handed out as `&Value`, so every
/// `NormalizedPolicy` built from it shares the same read-only allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPolicy(Arc<Value>);

impl RawPolicy {
    pub fn new(value: Value) -> Self {
        RawPolicy(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Safe-navigation lookup rooted at this record.
    pub fn get(&self, path: &[Segment]) -> Option<&Value> {
        lookup(&self.0, path)
    }

    /// True when the record is a JSON object.
    pub fn is_record(&self) -> bool {
        self.0.is_object()
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(a: &RawPolicy, b: &RawPolicy) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for RawPolicy {
    fn default() -> Self {
        RawPolicy::new(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for RawPolicy {
    fn from(value: Value) -> Self {
        RawPolicy::new(value)
    }
}

impl AsRef<Value> for RawPolicy {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

impl Serialize for RawPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawPolicy::new)
    }
}
