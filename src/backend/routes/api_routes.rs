/**
 * API Route Handlers
 *
 * This module defines the API endpoints.
 *
 * # Routes
 *
 * - `GET /api/health` - Liveness check
 * - `POST /api/users` - Create a user
 * - `GET /api/users/{id}` - Fetch a user
 */

use axum::{response::Json, Router};

use crate::backend::server::state::AppState;
use crate::backend::users::{create_user, get_user};
use crate::shared::envelope::SuccessEnvelope;

/// Health check handler
pub async fn health() -> Json<SuccessEnvelope<serde_json::Value>> {
    Json(SuccessEnvelope::new(serde_json::json!({ "status": "ok" })))
}

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/health", axum::routing::get(health))
        .route("/api/users", axum::routing::post(create_user))
        .route("/api/users/{id}", axum::routing::get(get_user))
}
