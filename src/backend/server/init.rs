/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Install the panic hook and build the failure dispatcher for the runtime mode
 * 2. Load the optional database pool
 * 3. Create the router with failure handling installed
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::error::{install_panic_hook, FailureDispatcher, KindRegistry, TracingSink};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::config::AppConfig;

/// Build the failure dispatcher for a configuration
///
/// The dispatcher is created once and lives for the whole process.
pub fn create_dispatcher(config: &AppConfig) -> Arc<FailureDispatcher> {
    Arc::new(FailureDispatcher::new(
        config.mode,
        KindRegistry::builtin(),
        Arc::new(TracingSink),
    ))
}

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient: a missing or unreachable
/// database is logged and the server continues without database features.
pub async fn create_app(config: &AppConfig) -> Router<()> {
    tracing::info!("Initializing faultline server in {} mode", config.mode);

    install_panic_hook();

    let dispatcher = create_dispatcher(config);
    let db_pool = load_database(config).await;

    let app_state = AppState::new(dispatcher, db_pool);
    let app = create_router(app_state);

    tracing::info!("Router configured");

    app
}
