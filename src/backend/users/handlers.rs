/**
 * User Handlers
 *
 * This module implements the user endpoints:
 *
 * - `POST /api/users` - create a user
 * - `GET /api/users/{id}` - fetch a user by ID
 *
 * Handlers only raise failures; they never format error responses. Input is
 * validated before the database is touched, so validation errors are reported
 * even when no database is configured.
 */

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::backend::error::{ApiError, Failure};
use crate::backend::users::db::{find_user, insert_user, User};
use crate::shared::envelope::SuccessEnvelope;

/// Seconds a client should wait before retrying while the database is down
pub const DATABASE_RETRY_AFTER_SECS: u64 = 30;

/// Create user request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// User response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Validate and normalize an email address
fn validate_email(email: Option<&str>) -> Result<String, ApiError> {
    let email = email.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required")
            .with_extra("fields", serde_json::json!(["email"])));
    }
    if !email.contains('@') {
        return Err(ApiError::validation("Invalid email format")
            .with_extra("fields", serde_json::json!(["email"]))
            .with_extra("rule", "email"));
    }
    Ok(email.to_ascii_lowercase())
}

fn database_unavailable() -> ApiError {
    ApiError::service_unavailable("Database not configured", DATABASE_RETRY_AFTER_SECS)
}

/// Create user handler
///
/// # Errors
///
/// * `400 ValidationError` - body is not valid JSON, or email missing or malformed
/// * `409 ConflictError` - email already registered
/// * `503 ServiceUnavailableError` - database not configured
pub async fn create_user(
    State(pool): State<Option<PgPool>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessEnvelope<UserResponse>>), Failure> {
    let Json(request) = payload?;
    let email = validate_email(request.email.as_deref())?;
    let pool = pool.ok_or_else(database_unavailable)?;

    tracing::info!("Creating user: {}", email);
    let user = insert_user(&pool, email, request.name).await?;
    tracing::info!("User created: {}", user.id);

    Ok((StatusCode::CREATED, Json(SuccessEnvelope::new(user.into()))))
}

/// Get user handler
///
/// # Errors
///
/// * `400 ValidationError` - `id` is not valid UTF-8 or not a UUID
/// * `404 NotFoundError` - no such user
/// * `503 ServiceUnavailableError` - database not configured
pub async fn get_user(
    State(pool): State<Option<PgPool>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<SuccessEnvelope<UserResponse>>, Failure> {
    let Path(id) = path?;
    let id = uuid::Uuid::parse_str(&id).map_err(|_| {
        ApiError::validation("Invalid user id").with_extra("fields", serde_json::json!(["id"]))
    })?;
    let pool = pool.ok_or_else(database_unavailable)?;

    let user = find_user(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(SuccessEnvelope::new(user.into())))
}
