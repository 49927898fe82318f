/**
 * Error Conversion
 *
 * This module provides the conversions that let handlers use `?` on anything
 * that can fail, and the `IntoResponse` implementations that hand failures to
 * the failure middleware.
 *
 * # HTTP Response Conversion
 *
 * Returning `Err(Failure)` from a handler does not render the failure
 * directly. The response produced here carries the `Failure` in its
 * extensions; the failure middleware removes it and runs the dispatcher,
 * which replaces the whole response.
 *
 * When no failure middleware is installed the parked response is still a
 * valid envelope: known errors are rendered with production redaction, every
 * other failure as the base fields of its kind. Nothing is translated or
 * logged here.
 */

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};

use crate::backend::error::dispatcher::{emit, redact, REDACTED_MESSAGE};
use crate::backend::error::driver::DriverFailure;
use crate::backend::error::failure::{Defect, Failure};
use crate::backend::error::types::ApiError;
use crate::shared::config::RuntimeMode;
use crate::shared::envelope::ErrorEnvelope;

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        Self::Known(err)
    }
}

impl From<DriverFailure> for Failure {
    fn from(err: DriverFailure) -> Self {
        Self::Driver(err)
    }
}

impl From<Defect> for Failure {
    fn from(err: Defect) -> Self {
        Self::Unclassified(err)
    }
}

/// Driver errors with a failure code become `Driver`; the rest are unclassified
impl From<sqlx::Error> for Failure {
    fn from(err: sqlx::Error) -> Self {
        match DriverFailure::from_sqlx(&err) {
            Some(driver) => Self::Driver(driver),
            None => Self::Unclassified(Defect::new(err.to_string())),
        }
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Self::Unclassified(Defect::new(format!("JSON error: {}", err)))
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Self::Unclassified(Defect::new(format!("I/O error: {}", err)))
    }
}

/// Malformed request bodies are the caller's fault
impl From<JsonRejection> for Failure {
    fn from(rejection: JsonRejection) -> Self {
        Self::Known(ApiError::validation(rejection.body_text()))
    }
}

/// Undecodable path parameters are the caller's fault as well
impl From<PathRejection> for Failure {
    fn from(rejection: PathRejection) -> Self {
        Self::Known(ApiError::validation(rejection.body_text()))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let envelope = match &self {
            Failure::Known(error) => redact(error, RuntimeMode::Production),
            _ if kind.is_operational() => {
                ErrorEnvelope::new(kind.name(), kind.default_message(), kind.status_code())
            }
            _ => ErrorEnvelope::new(kind.name(), REDACTED_MESSAGE, kind.status_code()),
        };
        let mut response = emit(kind.status(), &envelope);
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Failure::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::error::kind::ErrorKind;
    use axum::http::StatusCode;

    #[test]
    fn test_from_api_error() {
        let failure: Failure = ApiError::forbidden("Admins only").into();
        assert!(matches!(failure, Failure::Known(ref e) if e.kind() == ErrorKind::FORBIDDEN));
    }

    #[test]
    fn test_from_sqlx_row_not_found_is_driver() {
        let failure: Failure = sqlx::Error::RowNotFound.into();
        match failure {
            Failure::Driver(driver) => assert_eq!(driver.code, "02000"),
            other => panic!("Expected Driver, got {:?}", other),
        }
    }

    #[test]
    fn test_from_sqlx_pool_timeout_is_unclassified() {
        let failure: Failure = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(failure, Failure::Unclassified(_)));
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let failure: Failure = err.into();
        match failure {
            Failure::Unclassified(defect) => assert!(defect.message().starts_with("JSON error")),
            other => panic!("Expected Unclassified, got {:?}", other),
        }
    }

    #[test]
    fn test_parked_response_carries_failure() {
        let response = Failure::unclassified("x is null").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<Failure>().is_some());
    }

    #[test]
    fn test_parked_driver_failure_keeps_its_stack() {
        let driver = DriverFailure::new("P2010", "raw query failed")
            .with_stack(Some("at insert_user".to_string()));
        let response = Failure::from(driver).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match response.extensions().get::<Failure>() {
            Some(Failure::Driver(driver)) => assert_eq!(driver.stack(), Some("at insert_user")),
            other => panic!("Expected parked driver failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parked_driver_failure_uses_translated_status() {
        let response = Failure::from(DriverFailure::new("23505", "duplicate key")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_parked_response_uses_kind_status() {
        let response = ApiError::conflict("Email already registered").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
