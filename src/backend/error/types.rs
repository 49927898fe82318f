/**
 * API Error Types
 *
 * This module defines `ApiError`, a single classified failure. Its kind fixes
 * the status code and operational flag; the instance only adds a message,
 * flat extra fields and, for non-operational kinds, a captured stack.
 *
 * # Usage
 *
 * ```rust
 * use faultline::backend::error::ApiError;
 *
 * let err = ApiError::validation("Email is required")
 *     .with_extra("fields", serde_json::json!(["email"]));
 * assert_eq!(err.status_code(), 400);
 * ```
 */

use axum::http::StatusCode;
use serde_json::{Map, Value};
use std::backtrace::{Backtrace, BacktraceStatus};
use thiserror::Error;

use crate::backend::error::kind::ErrorKind;
use crate::shared::envelope::{ErrorEnvelope, RESERVED_FIELDS};

/// A failure classified under one `ErrorKind`
///
/// Instances are never mutated once handed to the dispatcher; the builder
/// methods consume `self`.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    extra: Map<String, Value>,
    stack: Option<String>,
}

impl ApiError {
    /// Create an error of the given kind
    ///
    /// An empty message falls back to the kind's default message. A stack is
    /// captured for non-operational kinds only.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let stack = if kind.is_operational() {
            None
        } else {
            capture_stack()
        };
        Self::with_parts(kind, message.into(), stack)
    }

    /// Build from already-captured parts without taking a new stack
    pub(crate) fn with_parts(kind: ErrorKind, message: String, stack: Option<String>) -> Self {
        let message = if message.is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };
        let stack = if kind.is_operational() { None } else { stack };
        Self {
            kind,
            message,
            extra: Map::new(),
            stack,
        }
    }

    /// Create an error carrying the kind's default message
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::VALIDATION, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NOT_FOUND, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::METHOD_NOT_ALLOWED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CONFLICT, message)
    }

    /// Rate limit error with a `retryAfter` hint in seconds
    pub fn too_many_requests(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::new(ErrorKind::TOO_MANY_REQUESTS, message).with_extra("retryAfter", retry_after_secs)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DATABASE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::INTERNAL, message)
    }

    /// Service unavailable error with a `retryAfter` hint in seconds
    pub fn service_unavailable(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::new(ErrorKind::SERVICE_UNAVAILABLE, message)
            .with_extra("retryAfter", retry_after_secs)
    }

    /// Add one extra field
    ///
    /// Keys that collide with the envelope's base fields (`name`, `message`,
    /// `statusCode`, `stack`) are ignored.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Replace the stack trace; ignored for operational kinds
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        if !self.kind.is_operational() {
            self.stack = stack;
        }
        self
    }

    /// Rebind to the canonical descriptor sharing this discriminator
    pub(crate) fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        if kind.is_operational() {
            self.stack = None;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Kind discriminator
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn is_operational(&self) -> bool {
        self.kind.is_operational()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// Capability shared by everything that can be rendered as an error envelope
pub trait ToEnvelope {
    /// Build `{ name, message, statusCode, ...extra }`
    ///
    /// Must be deterministic and free of side effects. Stacks are attached by
    /// the dispatcher, never here.
    fn to_envelope(&self) -> ErrorEnvelope;
}

impl ToEnvelope for ApiError {
    fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.name(), self.message.clone(), self.status_code())
            .with_extra(self.extra.clone())
    }
}

/// Capture the current stack, if the platform supports it
pub(crate) fn capture_stack() -> Option<String> {
    let backtrace = Backtrace::force_capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
