// crates/appt-analytics-server/src/server/tests.rs
// ============================================================================
// Module: Analytics Server Unit Tests
// Description: Unit tests for data-request processing and status mapping.
// Purpose: Validate envelope parsing, limits, and handler invocation counts.
// Dependencies: appt-analytics-server
// ============================================================================

//! ## Overview
//! Exercises `process_data` with in-memory fixtures: counting and erroring
//! stub handlers, oversized bodies, and malformed envelopes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only framing assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use appt_analytics_core::AnalyticsError;
use appt_analytics_core::AnalyticsHandler;
use appt_analytics_core::AnalyticsRequest;
use appt_analytics_core::AnalyticsResponse;
use appt_analytics_core::AppointmentSummaryService;
use appt_analytics_core::DispatchTable;
use appt_analytics_core::ResponseStatus;
use axum::http::StatusCode;
use serde_json::json;

use super::ServerState;
use super::process_data;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Stubs
// ============================================================================

struct CountingHandler {
    calls: AtomicUsize,
}

impl AnalyticsHandler for CountingHandler {
    fn handle(&self, _request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalyticsResponse::ok(json!({ "handled": true })))
    }
}

struct ErroringHandler;

impl AnalyticsHandler for ErroringHandler {
    fn handle(&self, _request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError> {
        Err(AnalyticsError::Computation("backend unavailable".to_string()))
    }
}

fn state_with(table: DispatchTable, max_request_bytes: usize) -> ServerState {
    ServerState {
        table: Arc::new(table),
        metrics: Arc::new(NoopMetrics),
        max_request_bytes,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies a valid envelope reaches the handler exactly once.
#[test]
fn data_request_invokes_handler_exactly_once() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let table =
        DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>);
    let state = state_with(table, 1024);

    let body = serde_json::to_vec(&json!({ "action": "ping" })).expect("serialize body");
    let (status, envelope, action) = process_data(&state, &body);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.status, ResponseStatus::Ok);
    assert_eq!(action.as_deref(), Some("ping"));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

/// Verifies malformed envelopes are rejected before dispatch.
#[test]
fn malformed_envelope_never_reaches_handler() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let table =
        DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>);
    let state = state_with(table, 1024);

    let (status, envelope, action) = process_data(&state, b"not json");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.status, ResponseStatus::Error);
    assert_eq!(action, None);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

/// Verifies oversized bodies are rejected before parsing.
#[test]
fn oversized_body_is_rejected() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let table =
        DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>);
    let state = state_with(table, 8);

    let body = serde_json::to_vec(&json!({ "action": "ping" })).expect("serialize body");
    let (status, envelope, _) = process_data(&state, &body);

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(envelope.status, ResponseStatus::Error);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

/// Verifies handler failures map to status codes by failure kind.
#[test]
fn handler_failure_maps_to_internal_error() {
    let table = DispatchTable::data_table(Arc::new(ErroringHandler));
    let state = state_with(table, 1024);

    let body = serde_json::to_vec(&json!({ "action": "ping" })).expect("serialize body");
    let (status, envelope, _) = process_data(&state, &body);

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope.status, ResponseStatus::Error);
    assert!(envelope.message.unwrap_or_default().contains("backend unavailable"));
}

/// Verifies client faults from the built-in service map to 400.
#[test]
fn unknown_action_maps_to_bad_request() {
    let table = DispatchTable::data_table(Arc::new(AppointmentSummaryService::new()));
    let state = state_with(table, 1024);

    let body = serde_json::to_vec(&json!({ "action": "chart" })).expect("serialize body");
    let (status, envelope, _) = process_data(&state, &body);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.status, ResponseStatus::Error);
    assert!(envelope.message.unwrap_or_default().contains("chart"));
}

/// Verifies an empty dispatch table answers 404 without invoking anything.
#[test]
fn empty_table_answers_not_found() {
    let state = state_with(DispatchTable::new(), 1024);

    let body = serde_json::to_vec(&json!({ "action": "ping" })).expect("serialize body");
    let (status, envelope, _) = process_data(&state, &body);

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.status, ResponseStatus::Error);
}
