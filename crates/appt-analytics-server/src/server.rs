// crates/appt-analytics-server/src/server.rs
// ============================================================================
// Module: Analytics HTTP Server
// Description: Axum surface routing the data endpoint through dispatch.
// Purpose: Serve the dispatch table over HTTP with size-capped bodies.
// Dependencies: appt-analytics-core, axum, serde_json, tokio
// ============================================================================

//! ## Overview
//! `POST /data` parses the request envelope and dispatches it through the
//! table under [`DATA_ENTRY_POINT`]; `GET /health` reports liveness. Unknown
//! paths are answered by the router with 404 and never reach the analytics
//! handler. Handler failures render an error envelope with a status mapped
//! from the failure kind.
//! Invariants:
//! - Request bodies beyond the configured byte limit are rejected with 413.
//! - The analytics handler is invoked at most once per data request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use appt_analytics_core::AnalyticsError;
use appt_analytics_core::AnalyticsRequest;
use appt_analytics_core::AnalyticsResponse;
use appt_analytics_core::DATA_ENTRY_POINT;
use appt_analytics_core::DispatchError;
use appt_analytics_core::DispatchOutcome;
use appt_analytics_core::DispatchTable;
use appt_analytics_core::EntryPointName;
use appt_analytics_core::ResponseStatus;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::telemetry::DispatchMetricEvent;
use crate::telemetry::DispatchMetrics;
use crate::telemetry::DispatchOutcomeLabel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Route serving the analytics data endpoint.
pub const DATA_PATH: &str = "/data";
/// Route serving the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by the analytics server.
///
/// # Invariants
/// - Messages are safe for operator display.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listener failed.
    #[error("failed to bind {addr}: {error}")]
    Bind {
        /// Address that failed to bind.
        addr: SocketAddr,
        /// Underlying I/O error text.
        error: String,
    },
    /// The accept loop terminated with an error.
    #[error("server terminated: {0}")]
    Serve(String),
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state for the HTTP handlers.
#[derive(Clone)]
struct ServerState {
    /// Dispatch table holding the registered analytics handler.
    table: Arc<DispatchTable>,
    /// Metrics sink for request counters and latencies.
    metrics: Arc<dyn DispatchMetrics>,
    /// Maximum accepted request body size in bytes.
    max_request_bytes: usize,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server exposing the dispatch table.
pub struct AnalyticsServer {
    /// Bound listener for the accept loop.
    listener: TcpListener,
    /// Address the listener is bound to.
    local_addr: SocketAddr,
    /// Shared handler state.
    state: ServerState,
}

impl AnalyticsServer {
    /// Binds the server to `addr` with the provided table and metrics sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the listener cannot be bound.
    pub async fn bind(
        addr: SocketAddr,
        table: Arc<DispatchTable>,
        metrics: Arc<dyn DispatchMetrics>,
        max_request_bytes: usize,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|err| ServerError::Bind {
            addr,
            error: err.to_string(),
        })?;
        let local_addr = listener.local_addr().map_err(|err| ServerError::Bind {
            addr,
            error: err.to_string(),
        })?;
        Ok(Self {
            listener,
            local_addr,
            state: ServerState {
                table,
                metrics,
                max_request_bytes,
            },
        })
    }

    /// Returns the bound listener address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] when the accept loop terminates.
    pub async fn serve(self) -> Result<(), ServerError> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .await
            .map_err(|err| ServerError::Serve(err.to_string()))
    }
}

/// Builds the router with the data and health routes.
///
/// The configured byte limit replaces axum's default body cap so limits
/// above the default are honored; `process_data` maps the same boundary to
/// the error envelope.
fn build_router(state: ServerState) -> Router {
    let max_request_bytes = state.max_request_bytes;
    Router::new()
        .route(HEALTH_PATH, get(handle_health))
        .route(DATA_PATH, post(handle_data))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Serves the liveness endpoint.
async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Serves the analytics data endpoint.
async fn handle_data(State(state): State<ServerState>, body: Bytes) -> Response {
    let started = Instant::now();
    let request_bytes = body.len();
    let (status, envelope, action) = process_data(&state, &body);
    let outcome = if envelope.status == ResponseStatus::Ok {
        DispatchOutcomeLabel::Ok
    } else {
        DispatchOutcomeLabel::Error
    };
    let event = DispatchMetricEvent {
        action,
        outcome,
        status: status.as_u16(),
        request_bytes,
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, started.elapsed());
    (status, Json(envelope)).into_response()
}

/// Parses, dispatches, and renders a data request.
fn process_data(
    state: &ServerState,
    body: &[u8],
) -> (StatusCode, AnalyticsResponse, Option<String>) {
    if body.len() > state.max_request_bytes {
        let message = format!(
            "request body is {} bytes (limit {})",
            body.len(),
            state.max_request_bytes
        );
        return (StatusCode::PAYLOAD_TOO_LARGE, AnalyticsResponse::error(message), None);
    }

    let request: AnalyticsRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            let message = format!("invalid request envelope: {err}");
            return (StatusCode::BAD_REQUEST, AnalyticsResponse::error(message), None);
        }
    };
    let action = request.action.clone();

    match state.table.dispatch(&EntryPointName::new(DATA_ENTRY_POINT), &request) {
        Ok(DispatchOutcome::Handled(response)) => (StatusCode::OK, response, Some(action)),
        Ok(DispatchOutcome::NotTargeted) => (
            StatusCode::NOT_FOUND,
            AnalyticsResponse::error("data entry point is not registered"),
            Some(action),
        ),
        Err(DispatchError::Handler {
            source,
            ..
        }) => {
            let status = match &source {
                AnalyticsError::UnknownAction(_) | AnalyticsError::InvalidParams(_) => {
                    StatusCode::BAD_REQUEST
                }
                AnalyticsError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, AnalyticsResponse::error(source.to_string()), Some(action))
        }
    }
}

#[cfg(test)]
mod tests;
