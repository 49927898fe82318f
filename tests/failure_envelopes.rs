//! Failure dispatch over HTTP
//!
//! Every route raises one kind of failure; the tests check the exact wire
//! envelope and the record handed to the sink.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::{scenario_server, DEFECT_STACK};
use faultline::shared::config::RuntimeMode;

#[tokio::test]
async fn test_validation_failure_is_rendered_verbatim() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/validation").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        r#"{"name":"ValidationError","message":"Email is required","statusCode":400}"#
    );
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn test_error_responses_are_json() {
    let (server, _sink) = scenario_server(RuntimeMode::Development);

    let response = server.get("/validation").await;

    assert_eq!(response.header("content-type"), "application/json");
}

#[tokio::test]
async fn test_unique_violation_becomes_conflict() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/duplicate").await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.text(),
        r#"{"name":"ConflictError","message":"duplicate key","statusCode":409}"#
    );
    let record = sink.last();
    assert_eq!(record.kind, "ConflictError");
    assert!(record.operational);
}

#[tokio::test]
async fn test_record_not_found_code_becomes_not_found() {
    let (server, _sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/missing").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_envelope!(body, "NotFoundError", "Record to delete does not exist.", 404);
}

#[tokio::test]
async fn test_unmapped_driver_code_is_a_redacted_database_error() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/unmapped").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_envelope!(body, "DatabaseError", "Internal server error", 500);
    assert_no_field!(body, "stack");

    let record = sink.last();
    assert_eq!(record.kind, "DatabaseError");
    assert_eq!(record.message, "Raw query failed");
}

#[tokio::test]
async fn test_unclassified_failure_is_redacted_in_production() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/defect").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text(),
        r#"{"name":"InternalServerError","message":"Internal server error","statusCode":500}"#
    );

    let record = sink.last();
    assert_eq!(record.kind, "InternalServerError");
    assert_eq!(record.message, "x is null");
    assert_eq!(record.stack.as_deref(), Some(DEFECT_STACK));
    assert!(!record.operational);
}

#[tokio::test]
async fn test_unclassified_failure_keeps_details_in_development() {
    let (server, _sink) = scenario_server(RuntimeMode::Development);

    let response = server.get("/defect").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_envelope!(body, "InternalServerError", "x is null", 500);
    assert_eq!(body["stack"], DEFECT_STACK);
}

#[tokio::test]
async fn test_production_drops_extra_fields_of_non_operational_kinds() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/database").await;

    let body: Value = response.json();
    assert_envelope!(body, "DatabaseError", "Internal server error", 500);
    assert_no_field!(body, "table");
    assert_eq!(sink.last().extra["table"], "users");
}

#[tokio::test]
async fn test_development_keeps_extra_fields_of_non_operational_kinds() {
    let (server, _sink) = scenario_server(RuntimeMode::Development);

    let response = server.get("/database").await;

    let body: Value = response.json();
    assert_envelope!(body, "DatabaseError", "connection reset", 500);
    assert_eq!(body["table"], "users");
}

#[tokio::test]
async fn test_extra_fields_sit_at_the_top_level() {
    let (server, _sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/retry").await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.text(),
        r#"{"name":"TooManyRequestsError","message":"Slow down","statusCode":429,"retryAfter":60}"#
    );
}

#[tokio::test]
async fn test_panicking_handler_is_redacted_in_production() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/panic").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text(),
        r#"{"name":"InternalServerError","message":"Internal server error","statusCode":500}"#
    );
    assert_eq!(sink.last().message, "x is null");
}

#[tokio::test]
async fn test_panicking_handler_keeps_message_in_development() {
    let (server, _sink) = scenario_server(RuntimeMode::Development);

    let response = server.get("/panic").await;

    let body: Value = response.json();
    assert_envelope!(body, "InternalServerError", "x is null", 500);
    let stack = body["stack"].as_str().unwrap_or_default();
    assert!(!stack.is_empty());
    assert!(!stack.contains("from_panic"), "stack taken at catch site: {}", stack);
}

#[tokio::test]
async fn test_successful_responses_bypass_the_dispatcher() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    let response = server.get("/ok").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "ok");
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn test_each_failure_is_recorded_once() {
    let (server, sink) = scenario_server(RuntimeMode::Production);

    server.get("/validation").await;
    server.get("/defect").await;
    server.get("/panic").await;

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].path, "/validation");
    assert_eq!(records[1].path, "/defect");
    assert_eq!(records[2].path, "/panic");
    assert!(records.iter().all(|r| r.method == "GET"));
}
