/**
 * Failure Dispatcher
 *
 * The single place where a request's failure becomes an HTTP response.
 *
 * # Phases
 *
 * Each failure passes through every phase exactly once:
 *
 * 1. **Classify** - known errors are used as-is (rebound to the registry's
 *    descriptor for their discriminator), driver failures are translated,
 *    anything else becomes an `InternalServerError`
 * 2. **Log** - the sink receives the full, pre-redaction record
 * 3. **Redact** - in production, non-operational failures lose their message,
 *    extra fields and stack
 * 4. **Emit** - the envelope is serialized as JSON with the kind's status
 *
 * The dispatcher never panics. If the envelope cannot be serialized with its
 * extra fields, only the base fields are sent.
 */

use axum::{
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;

use crate::backend::error::driver::translate;
use crate::backend::error::failure::Failure;
use crate::backend::error::kind::{ErrorKind, KindRegistry};
use crate::backend::error::sink::{FailureRecord, FailureSink, TracingSink};
use crate::backend::error::types::{ApiError, ToEnvelope};
use crate::shared::config::RuntimeMode;
use crate::shared::envelope::{ErrorEnvelope, FALLBACK_BODY};

/// Message sent in place of a non-operational failure's message in production
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Request details recorded alongside a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::new(request.method().as_str(), request.uri().path())
    }
}

/// Terminal failure handler shared by every request
///
/// Built once at startup and shared through `Arc`. It holds no per-request
/// state, so concurrent requests dispatch without coordination.
pub struct FailureDispatcher {
    mode: RuntimeMode,
    registry: KindRegistry,
    sink: Arc<dyn FailureSink>,
}

impl fmt::Debug for FailureDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureDispatcher")
            .field("mode", &self.mode)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl FailureDispatcher {
    /// Create a dispatcher
    ///
    /// # Arguments
    ///
    /// * `mode` - Runtime mode, fixed for the dispatcher's lifetime
    /// * `registry` - Kinds used to canonicalize known failures
    /// * `sink` - Receiver of pre-redaction failure records
    pub fn new(mode: RuntimeMode, registry: KindRegistry, sink: Arc<dyn FailureSink>) -> Self {
        Self {
            mode,
            registry,
            sink,
        }
    }

    /// Dispatcher over the built-in kinds, logging through `tracing`
    pub fn with_tracing(mode: RuntimeMode) -> Self {
        Self::new(mode, KindRegistry::builtin(), Arc::new(TracingSink))
    }

    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Resolve a failure into exactly one `ApiError`
    pub fn classify(&self, failure: Failure) -> ApiError {
        match failure {
            Failure::Known(error) => match self.registry.resolve(error.name()) {
                Some(canonical) => error.with_kind(canonical),
                None => {
                    tracing::warn!(kind = error.name(), "failure uses an unregistered error kind");
                    error
                }
            },
            other => classify(other),
        }
    }

    /// Build the outward envelope for a classified error
    pub fn render(&self, error: &ApiError) -> ErrorEnvelope {
        redact(error, self.mode)
    }

    /// Classify, log, redact and emit one failure
    pub fn dispatch(&self, failure: Failure, ctx: &RequestContext) -> Response {
        let error = self.classify(failure);
        self.sink.record(&FailureRecord::capture(&error, ctx));
        let envelope = self.render(&error);
        emit(error.status(), &envelope)
    }
}

/// Classification without a registry; known errors pass through untouched
pub(crate) fn classify(failure: Failure) -> ApiError {
    match failure {
        Failure::Known(error) => error,
        Failure::Driver(driver) => translate(&driver),
        Failure::Unclassified(defect) => {
            let (message, stack) = defect.into_parts();
            ApiError::with_parts(ErrorKind::INTERNAL, message, stack)
        }
    }
}

/// Apply the runtime mode's redaction policy
///
/// Operational errors are always shown as-is and never carry a stack.
/// Non-operational errors are replaced by a generic envelope in production
/// and shown with their stack otherwise.
pub fn redact(error: &ApiError, mode: RuntimeMode) -> ErrorEnvelope {
    if error.is_operational() {
        return error.to_envelope();
    }
    if mode.is_production() {
        ErrorEnvelope::new(error.name(), REDACTED_MESSAGE, error.status_code())
    } else {
        error.to_envelope().with_stack(error.stack().map(str::to_string))
    }
}

/// Serialize an envelope into a JSON response
pub(crate) fn emit(status: StatusCode, envelope: &ErrorEnvelope) -> Response {
    let body = match envelope.to_json_bytes() {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(
                kind = %envelope.name,
                error = %err,
                "failed to serialize error envelope, sending base fields only"
            );
            envelope
                .base_only()
                .to_json_bytes()
                .unwrap_or_else(|_| FALLBACK_BODY.as_bytes().to_vec())
        }
    };

    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}
