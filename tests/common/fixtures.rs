//! Test servers and failure sinks

use axum::{routing::get, Router};
use axum_test::TestServer;
use std::sync::{Arc, Mutex};

use faultline::backend::error::{
    install_panic_hook, ApiError, Defect, DriverFailure, Failure, FailureDispatcher,
    FailureRecord, FailureSink, KindRegistry,
};
use faultline::backend::middleware::with_failure_handling;
use faultline::backend::routes::create_router;
use faultline::backend::server::AppState;
use faultline::shared::config::RuntimeMode;

/// Stack attached to the `/defect` route so envelopes are deterministic
pub const DEFECT_STACK: &str = "at load_profile (src/profile.rs:42)";

/// Sink that keeps every record in memory
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn last(&self) -> FailureRecord {
        self.records()
            .pop()
            .expect("no failure was recorded")
    }
}

impl FailureSink for RecordingSink {
    fn record(&self, record: &FailureRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Dispatcher with the built-in kinds and a recording sink
pub fn recording_dispatcher(mode: RuntimeMode) -> (Arc<FailureDispatcher>, Arc<RecordingSink>) {
    install_panic_hook();
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = FailureDispatcher::new(mode, KindRegistry::builtin(), sink.clone());
    (Arc::new(dispatcher), sink)
}

async fn panicking_handler() -> &'static str {
    panic!("x is null")
}

/// Router raising one failure per route
pub fn scenario_router() -> Router {
    Router::new()
        .route("/ok", get(|| async { "ok" }))
        .route(
            "/validation",
            get(|| async { Err::<(), _>(ApiError::validation("Email is required")) }),
        )
        .route(
            "/duplicate",
            get(|| async { Err::<(), _>(Failure::from(DriverFailure::new("23505", "duplicate key"))) }),
        )
        .route(
            "/missing",
            get(|| async { Err::<(), _>(Failure::from(DriverFailure::new("P2025", "Record to delete does not exist."))) }),
        )
        .route(
            "/unmapped",
            get(|| async { Err::<(), _>(Failure::from(DriverFailure::new("P2010", "Raw query failed"))) }),
        )
        .route(
            "/defect",
            get(|| async {
                Err::<(), _>(Failure::Unclassified(Defect::with_stack(
                    "x is null",
                    Some(DEFECT_STACK.to_string()),
                )))
            }),
        )
        .route(
            "/database",
            get(|| async {
                Err::<(), _>(
                    ApiError::database("connection reset").with_extra("table", "users"),
                )
            }),
        )
        .route(
            "/retry",
            get(|| async { Err::<(), _>(ApiError::too_many_requests("Slow down", 60)) }),
        )
        .route("/panic", get(panicking_handler))
}

/// Test server over [`scenario_router`]
pub fn scenario_server(mode: RuntimeMode) -> (TestServer, Arc<RecordingSink>) {
    let (dispatcher, sink) = recording_dispatcher(mode);
    let app = with_failure_handling(scenario_router(), dispatcher);
    (TestServer::new(app).unwrap(), sink)
}

/// Test server over the application router without a database
pub fn app_server(mode: RuntimeMode) -> (TestServer, Arc<RecordingSink>) {
    let (dispatcher, sink) = recording_dispatcher(mode);
    let app = create_router(AppState::new(dispatcher, None));
    (TestServer::new(app).unwrap(), sink)
}
