// crates/appt-analytics-server/tests/http_endpoint.rs
// ============================================================================
// Module: HTTP Endpoint Integration Tests
// Description: End-to-end tests for the data and health routes.
// Purpose: Validate routing, suppression, and envelopes over real sockets.
// Dependencies: appt-analytics-server, tokio
// ============================================================================

//! ## Overview
//! Boots the analytics server on an ephemeral loopback port and exercises it
//! with a minimal HTTP/1.1 client over raw TCP.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use appt_analytics_core::AnalyticsError;
use appt_analytics_core::AnalyticsHandler;
use appt_analytics_core::AnalyticsRequest;
use appt_analytics_core::AnalyticsResponse;
use appt_analytics_core::AppointmentSummaryService;
use appt_analytics_core::DispatchTable;
use appt_analytics_server::AnalyticsServer;
use appt_analytics_server::NoopMetrics;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

// ============================================================================
// SECTION: Helpers
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

async fn spawn_server(table: DispatchTable) -> SocketAddr {
    spawn_server_with_limit(table, 64 * 1024).await
}

async fn spawn_server_with_limit(table: DispatchTable, max_request_bytes: usize) -> SocketAddr {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("parse loopback addr");
    let server =
        AnalyticsServer::bind(addr, Arc::new(table), Arc::new(NoopMetrics), max_request_bytes)
            .await
            .expect("bind ephemeral loopback port");
    let local = server.local_addr();
    tokio::spawn(async move {
        let _ = server.serve().await;
    });
    local
}

async fn http_request(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect to server");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.expect("write request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    let text = String::from_utf8_lossy(&raw).to_string();

    let status_line = text.lines().next().expect("response status line");
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .expect("status code field")
        .parse()
        .expect("numeric status code");
    let payload = text.split_once("\r\n\r\n").map(|(_, rest)| rest.to_string()).unwrap_or_default();
    (status, payload)
}

fn body_json(payload: &str) -> Value {
    serde_json::from_str(payload.trim()).expect("response body must be JSON")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies the health route reports liveness.
#[tokio::test]
async fn health_route_reports_ok() {
    let addr = spawn_server(DispatchTable::data_table(Arc::new(AppointmentSummaryService::new())))
        .await;

    let (status, payload) = http_request(addr, "GET", "/health", "").await;
    assert_eq!(status, 200);
    assert_eq!(body_json(&payload), json!({ "status": "ok" }));
}

/// Verifies the data route serves a summary end to end.
#[tokio::test]
async fn data_route_serves_summary() {
    let addr = spawn_server(DispatchTable::data_table(Arc::new(AppointmentSummaryService::new())))
        .await;

    let body = json!({ "action": "summary", "params": { "statuses": ["booked", "booked"] } });
    let (status, payload) = http_request(addr, "POST", "/data", &body.to_string()).await;

    assert_eq!(status, 200);
    let envelope = body_json(&payload);
    assert_eq!(envelope["status"], json!("ok"));
    assert_eq!(envelope["data"]["total"], json!(2));
    assert_eq!(envelope["data"]["counts"]["booked"], json!(2));
}

/// Verifies unknown paths answer 404 without invoking the handler.
#[tokio::test]
async fn unknown_path_never_invokes_handler() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let addr = spawn_server(DispatchTable::data_table(
        Arc::clone(&handler) as Arc<dyn AnalyticsHandler>
    ))
    .await;

    let body = json!({ "action": "ping" }).to_string();
    let (status, _) = http_request(addr, "POST", "/index", &body).await;
    assert_eq!(status, 404);

    let (status, _) = http_request(addr, "POST", "/data.php", &body).await;
    assert_eq!(status, 404);

    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);

    let (status, _) = http_request(addr, "POST", "/data", &body).await;
    assert_eq!(status, 200);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

/// Verifies the wrong method on the data route is rejected.
#[tokio::test]
async fn wrong_method_on_data_route_is_rejected() {
    let addr = spawn_server(DispatchTable::data_table(Arc::new(AppointmentSummaryService::new())))
        .await;

    let (status, _) = http_request(addr, "GET", "/data", "").await;
    assert_eq!(status, 405);
}

/// Verifies configured limits above the framework default body cap are
/// honored for large-but-allowed requests.
#[tokio::test]
async fn large_body_within_configured_limit_is_served() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let addr = spawn_server_with_limit(
        DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>),
        4 * 1024 * 1024,
    )
    .await;

    let padding = "x".repeat(3 * 1024 * 1024);
    let body = json!({ "action": "ping", "params": { "pad": padding } }).to_string();
    let (status, payload) = http_request(addr, "POST", "/data", &body).await;

    assert_eq!(status, 200, "unexpected response: {payload}");
    assert_eq!(body_json(&payload), json!({ "status": "ok", "data": { "handled": true } }));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

/// Verifies bodies beyond the configured limit stay rejected.
#[tokio::test]
async fn large_body_beyond_configured_limit_is_rejected() {
    let handler = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let addr = spawn_server_with_limit(
        DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>),
        1024,
    )
    .await;

    let padding = "x".repeat(4 * 1024);
    let body = json!({ "action": "ping", "params": { "pad": padding } }).to_string();
    let (status, _) = http_request(addr, "POST", "/data", &body).await;

    assert_eq!(status, 413);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

/// Verifies handler faults surface as error envelopes.
#[tokio::test]
async fn unknown_action_yields_error_envelope() {
    let addr = spawn_server(DispatchTable::data_table(Arc::new(AppointmentSummaryService::new())))
        .await;

    let body = json!({ "action": "chart" }).to_string();
    let (status, payload) = http_request(addr, "POST", "/data", &body).await;

    assert_eq!(status, 400);
    let envelope = body_json(&payload);
    assert_eq!(envelope["status"], json!("error"));
    assert!(
        envelope["message"].as_str().unwrap_or_default().contains("chart"),
        "unexpected envelope: {envelope}"
    );
}
