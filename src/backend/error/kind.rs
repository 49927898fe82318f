/**
 * Error Kind Registry
 *
 * This module defines the closed set of error kinds the API can report and
 * the registry that keeps their discriminators unique.
 *
 * # Kinds
 *
 * An `ErrorKind` is a descriptor, not an error: it fixes the discriminator,
 * HTTP status and operational flag that every failure of that kind carries.
 * Individual failures (`ApiError`) only supply a message and extra fields.
 *
 * | Kind                      | Status | Operational |
 * |---------------------------|--------|-------------|
 * | `ValidationError`         | 400    | yes         |
 * | `UnauthorizedError`       | 401    | yes         |
 * | `ForbiddenError`          | 403    | yes         |
 * | `NotFoundError`           | 404    | yes         |
 * | `MethodNotAllowedError`   | 405    | yes         |
 * | `ConflictError`           | 409    | yes         |
 * | `TooManyRequestsError`    | 429    | yes         |
 * | `DatabaseError`           | 500    | no          |
 * | `InternalServerError`     | 500    | no          |
 * | `ServiceUnavailableError` | 503    | yes         |
 *
 * # Adding Kinds
 *
 * Domain-specific kinds are declared as constants and registered:
 *
 * ```rust
 * use faultline::backend::error::kind::{ErrorKind, KindRegistry};
 *
 * const PAYMENT_REQUIRED: ErrorKind =
 *     ErrorKind::define("PaymentRequiredError", 402, true, "Payment required");
 *
 * let mut registry = KindRegistry::builtin();
 * registry.register(PAYMENT_REQUIRED).unwrap();
 * ```
 *
 * A status outside 100..=599 in a `const` definition fails compilation.
 */

use axum::http::StatusCode;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Lowest status code a kind may declare
pub const MIN_STATUS: u16 = 100;

/// Highest status code a kind may declare
pub const MAX_STATUS: u16 = 599;

/// Immutable descriptor of one error kind
///
/// Two kinds are equal when their discriminators are equal; the other
/// attributes are never consulted for identity.
#[derive(Debug, Clone, Copy)]
pub struct ErrorKind {
    name: &'static str,
    status_code: u16,
    operational: bool,
    default_message: &'static str,
}

impl ErrorKind {
    pub const VALIDATION: ErrorKind =
        ErrorKind::define("ValidationError", 400, true, "Validation failed");
    pub const UNAUTHORIZED: ErrorKind =
        ErrorKind::define("UnauthorizedError", 401, true, "Unauthorized");
    pub const FORBIDDEN: ErrorKind = ErrorKind::define("ForbiddenError", 403, true, "Forbidden");
    pub const NOT_FOUND: ErrorKind =
        ErrorKind::define("NotFoundError", 404, true, "Resource not found");
    pub const METHOD_NOT_ALLOWED: ErrorKind =
        ErrorKind::define("MethodNotAllowedError", 405, true, "Method not allowed");
    pub const CONFLICT: ErrorKind =
        ErrorKind::define("ConflictError", 409, true, "Resource already exists");
    pub const TOO_MANY_REQUESTS: ErrorKind =
        ErrorKind::define("TooManyRequestsError", 429, true, "Too many requests");
    pub const DATABASE: ErrorKind =
        ErrorKind::define("DatabaseError", 500, false, "Database error");
    pub const INTERNAL: ErrorKind =
        ErrorKind::define("InternalServerError", 500, false, "Internal server error");
    pub const SERVICE_UNAVAILABLE: ErrorKind =
        ErrorKind::define("ServiceUnavailableError", 503, true, "Service unavailable");

    /// Define a kind in a const context
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `status_code` is
    /// outside 100..=599 or `name` is empty.
    pub const fn define(
        name: &'static str,
        status_code: u16,
        operational: bool,
        default_message: &'static str,
    ) -> Self {
        assert!(
            status_code >= MIN_STATUS && status_code <= MAX_STATUS,
            "error kind status code must be in 100..=599"
        );
        assert!(!name.is_empty(), "error kind name must not be empty");
        Self {
            name,
            status_code,
            operational,
            default_message,
        }
    }

    /// Define a kind from values only known at runtime
    ///
    /// # Errors
    ///
    /// * `RegistryError::EmptyName` - `name` is empty
    /// * `RegistryError::InvalidStatus` - `status_code` is outside 100..=599
    pub fn checked(
        name: &'static str,
        status_code: u16,
        operational: bool,
        default_message: &'static str,
    ) -> Result<Self, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if !(MIN_STATUS..=MAX_STATUS).contains(&status_code) {
            return Err(RegistryError::InvalidStatus { name, status_code });
        }
        Ok(Self {
            name,
            status_code,
            operational,
            default_message,
        })
    }

    /// Discriminator, serialized as `name` in envelopes
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Status code as an HTTP status
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Whether the failure is expected and safe to describe to the caller
    pub const fn is_operational(&self) -> bool {
        self.operational
    }

    pub const fn default_message(&self) -> &'static str {
        self.default_message
    }

    /// Whether every attribute, not only the discriminator, matches
    pub fn same_attributes(&self, other: &ErrorKind) -> bool {
        self.name == other.name
            && self.status_code == other.status_code
            && self.operational == other.operational
            && self.default_message == other.default_message
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ErrorKind {}

impl Hash for ErrorKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Every kind shipped with the crate
pub const BUILTIN_KINDS: [ErrorKind; 10] = [
    ErrorKind::VALIDATION,
    ErrorKind::UNAUTHORIZED,
    ErrorKind::FORBIDDEN,
    ErrorKind::NOT_FOUND,
    ErrorKind::METHOD_NOT_ALLOWED,
    ErrorKind::CONFLICT,
    ErrorKind::TOO_MANY_REQUESTS,
    ErrorKind::DATABASE,
    ErrorKind::INTERNAL,
    ErrorKind::SERVICE_UNAVAILABLE,
];

/// Errors raised while defining or registering kinds
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("error kind name must not be empty")]
    EmptyName,

    #[error("status code {status_code} of kind '{name}' is outside 100..=599")]
    InvalidStatus { name: &'static str, status_code: u16 },

    #[error("kind '{0}' is already registered with different attributes")]
    Duplicate(&'static str),
}

/// Set of kinds known to the dispatcher, keyed by discriminator
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<&'static str, ErrorKind>,
}

impl KindRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in kind
    pub fn builtin() -> Self {
        let kinds = BUILTIN_KINDS.iter().map(|kind| (kind.name(), *kind)).collect();
        Self { kinds }
    }

    /// Register a kind
    ///
    /// Registering a descriptor identical to one already present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if the discriminator is already bound
    /// to a descriptor with different attributes.
    pub fn register(&mut self, kind: ErrorKind) -> Result<(), RegistryError> {
        match self.kinds.get(kind.name()) {
            Some(existing) if existing.same_attributes(&kind) => Ok(()),
            Some(_) => Err(RegistryError::Duplicate(kind.name())),
            None => {
                self.kinds.insert(kind.name(), kind);
                Ok(())
            }
        }
    }

    /// Look up the canonical descriptor for a discriminator
    pub fn resolve(&self, name: &str) -> Option<ErrorKind> {
        self.kinds.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered kinds in discriminator order
    pub fn iter(&self) -> impl Iterator<Item = &ErrorKind> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
