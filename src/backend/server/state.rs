/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - The failure dispatcher, built once at startup
 * - The optional database pool
 *
 * Nothing in it is mutated after startup; cloning only bumps reference counts.
 */

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::error::FailureDispatcher;

/// Application state shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Terminal failure handler
    ///
    /// Installed as router middleware state; handlers never call it directly.
    pub dispatcher: Arc<FailureDispatcher>,

    /// Database connection pool
    ///
    /// This is `None` if the database is not configured (e.g., if
    /// `DATABASE_URL` environment variable is not set). Handlers should
    /// check for `None` before using the database.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(dispatcher: Arc<FailureDispatcher>, db_pool: Option<PgPool>) -> Self {
        Self {
            dispatcher,
            db_pool,
        }
    }
}

/// Implement FromRef for the failure dispatcher
impl FromRef<AppState> for Arc<FailureDispatcher> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.clone()
    }
}

/// Implement FromRef for Option<PgPool>
///
/// This allows Axum handlers to extract the optional database pool
/// directly from `AppState`.
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
