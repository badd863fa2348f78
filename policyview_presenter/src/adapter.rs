//! Backend adapter layer: turn a fetched customer payload into `RawPolicy` records.
//!
//! The backend answers with
//! `{ "response": { "policies": [ ... ] }, "success": true }`.
//! This module is the only place that knows that envelope:
//! - No IO (the transport hands us the body)
//! - Any failure along the way yields an empty list, never an error to the screen
//! - `normalize` only ever sees JSON objects

use std::fmt::Display;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use policyview_core::RawPolicy;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload top level is {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// Article-prefixed JSON type name for error messages (`"an array"`).
pub fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a response body, requiring an object at the top level.
pub fn parse_payload(body: &str) -> Result<Value, PayloadError> {
    let v: Value = serde_json::from_str(body)?;
    if !v.is_object() {
        return Err(PayloadError::NotAnObject { found: value_kind(&v) });
    }
    Ok(v)
}

/// Trait: pull raw policy records out of a parsed payload.
pub trait PolicyExtractor {
    /// Records in payload order. Never fails; unusable payloads yield `[]`.
    fn extract(&self, payload: &Value) -> Vec<RawPolicy>;
}

/// Envelope key names, overridable for backends that rename them.
#[derive(Clone, Debug)]
pub struct PayloadKeys {
    pub response: &'static str,
    pub policies: &'static str,
    pub success: &'static str,
}

impl Default for PayloadKeys {
    fn default() -> Self {
        Self {
            response: "response",
            policies: "policies",
            success: "success",
        }
    }
}

/// Extractor for the customer-by-username envelope.
///
/// `require_success` is off by default: the app reads `response.policies`
/// whatever the `success` flag says.
#[derive(Clone, Debug, Default)]
pub struct BackendPayloadExtractor {
    pub keys: PayloadKeys,
    pub require_success: bool,
}

impl BackendPayloadExtractor {
    pub fn strict() -> Self {
        Self {
            require_success: true,
            ..Self::default()
        }
    }
}

impl PolicyExtractor for BackendPayloadExtractor {
    fn extract(&self, payload: &Value) -> Vec<RawPolicy> {
        if self.require_success && payload.get(self.keys.success) != Some(&Value::Bool(true)) {
            warn!("payload not marked successful; no policies");
            return Vec::new();
        }

        let Some(items) = payload
            .get(self.keys.response)
            .and_then(|r| r.get(self.keys.policies))
            .and_then(Value::as_array)
        else {
            debug!("payload has no policy list");
            return Vec::new();
        };

        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                warn!(index = idx, found = value_kind(item), "skipping non-object policy entry");
                continue;
            }
            out.push(RawPolicy::new(item.clone()));
        }
        debug!(count = out.len(), "extracted policies");
        out
    }
}

/// Fetch result to raw records: a transport error or an unparsable body is
/// logged and yields `[]`.
pub fn policies_from_body<X, E>(extractor: &X, body: Result<&str, E>) -> Vec<RawPolicy>
where
    X: PolicyExtractor + ?Sized,
    E: Display,
{
    let body = match body {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "policy fetch failed");
            return Vec::new();
        }
    };
    match parse_payload(body) {
        Ok(payload) => extractor.extract(&payload),
        Err(e) => {
            warn!(error = %e, "policy payload rejected");
            Vec::new()
        }
    }
}
