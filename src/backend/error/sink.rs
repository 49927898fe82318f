//! Failure logging
//!
//! The dispatcher hands every failure to a [`FailureSink`] before any
//! redaction, so operators always see the original message and stack.
//! [`TracingSink`] is the sink used by the server.

use serde_json::{Map, Value};

use crate::backend::error::dispatcher::RequestContext;
use crate::backend::error::types::ApiError;

/// Pre-redaction record of one failed request
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub kind: &'static str,
    pub status_code: u16,
    pub operational: bool,
    pub message: String,
    pub extra: Map<String, Value>,
    pub stack: Option<String>,
    pub method: String,
    pub path: String,
}

impl FailureRecord {
    pub fn capture(error: &ApiError, ctx: &RequestContext) -> Self {
        Self {
            kind: error.name(),
            status_code: error.status_code(),
            operational: error.is_operational(),
            message: error.message().to_string(),
            extra: error.extra().clone(),
            stack: error.stack().map(str::to_string),
            method: ctx.method.clone(),
            path: ctx.path.clone(),
        }
    }
}

/// Receiver of failure records
///
/// Called synchronously from the dispatcher; implementations must not block
/// or panic.
pub trait FailureSink: Send + Sync {
    fn record(&self, record: &FailureRecord);
}

/// Sink writing records through `tracing`
///
/// Operational failures are logged at `WARN`, everything else at `ERROR`
/// together with the stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, record: &FailureRecord) {
        let extra = Value::Object(record.extra.clone());
        if record.operational {
            tracing::warn!(
                kind = record.kind,
                status = record.status_code,
                method = %record.method,
                path = %record.path,
                extra = %extra,
                "{}",
                record.message
            );
        } else {
            tracing::error!(
                kind = record.kind,
                status = record.status_code,
                method = %record.method,
                path = %record.path,
                extra = %extra,
                stack = record.stack.as_deref().unwrap_or("<unavailable>"),
                "{}",
                record.message
            );
        }
    }
}
