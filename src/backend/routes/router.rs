/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes
 * 2. Method fallback (`405 MethodNotAllowedError`)
 * 3. Fallback handler (`404 NotFoundError`)
 * 4. Failure handling layers, wrapping everything above
 */

use axum::{
    http::{Method, Uri},
    Router,
};

use crate::backend::error::{ApiError, Failure};
use crate::backend::middleware::with_failure_handling;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> Failure {
    ApiError::not_found(format!("Route {} not found", uri.path())).into()
}

/// Fallback for known paths requested with an unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> Failure {
    ApiError::method_not_allowed(format!("Method {} not allowed on {}", method, uri.path())).into()
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the dispatcher and services
///
/// # Returns
///
/// Configured Axum Router ready to serve requests. Every failure raised by a
/// route, the fallback or a panicking handler is rendered by the dispatcher
/// in `app_state`.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    // Fallback handlers for 405 and 404
    let router = router
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found);

    let router = with_failure_handling(router, app_state.dispatcher.clone());

    router.with_state(app_state)
}
