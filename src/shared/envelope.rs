//! Response Envelopes
//!
//! Wire records returned by every API endpoint. Failed requests carry an
//! [`ErrorEnvelope`]; successful ones wrap their payload in a
//! [`SuccessEnvelope`].
//!
//! # Error Format
//!
//! ```json
//! {
//!   "name": "ValidationError",
//!   "message": "Email is required",
//!   "statusCode": 400,
//!   "fields": ["email"]
//! }
//! ```
//!
//! Kind-specific fields (`retryAfter`, `fields`, ...) sit at the top level next
//! to the base fields. `stack` is only ever present for non-operational
//! failures served outside production.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names owned by the envelope itself.
///
/// Extra fields using one of these keys would collide with the base record,
/// so they are never serialized as extras.
pub const RESERVED_FIELDS: [&str; 4] = ["name", "message", "statusCode", "stack"];

/// Body sent when even the base fields could not be serialized.
pub const FALLBACK_BODY: &str =
    r#"{"name":"InternalServerError","message":"Internal server error","statusCode":500}"#;

/// JSON body of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Kind discriminator, e.g. `NotFoundError`
    pub name: String,
    /// Caller-facing message
    pub message: String,
    /// HTTP status code, repeated in the body
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Kind-specific fields, flattened into the top level
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Captured stack trace (development mode, non-operational kinds only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    /// Create an envelope with no extra fields and no stack
    pub fn new(name: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status_code,
            extra: Map::new(),
            stack: None,
        }
    }

    /// Attach extra fields, dropping any that use a reserved key
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra
            .into_iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .collect();
        self
    }

    /// Attach a stack trace
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }

    /// Copy of this envelope holding only `name`, `message` and `statusCode`
    pub fn base_only(&self) -> Self {
        Self::new(self.name.clone(), self.message.clone(), self.status_code)
    }

    /// Serialize to the JSON bytes sent on the wire
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// JSON body of a successful request
///
/// ```json
/// { "data": { "id": "..." } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
