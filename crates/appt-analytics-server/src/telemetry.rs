// crates/appt-analytics-server/src/telemetry.rs
// ============================================================================
// Module: Dispatch Telemetry
// Description: Observability hooks for the data endpoint.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for data-endpoint request
//! counters and latency histograms. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Security posture: telemetry must not leak request payloads; labels carry
//! only action names and outcome classifications.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for data-endpoint histograms.
pub const DISPATCH_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Data-endpoint request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DispatchOutcomeLabel {
    /// The handler produced an ok envelope.
    Ok,
    /// The request was rejected before or by the handler.
    Error,
}

impl DispatchOutcomeLabel {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Data-endpoint metric event payload.
///
/// # Invariants
/// - `action` is `None` when the envelope failed to parse.
#[derive(Debug, Clone)]
pub struct DispatchMetricEvent {
    /// Requested analytics action when available.
    pub action: Option<String>,
    /// Request outcome classification.
    pub outcome: DispatchOutcomeLabel,
    /// HTTP status code returned to the client.
    pub status: u16,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for data-endpoint requests and latencies.
pub trait DispatchMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: DispatchMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: DispatchMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl DispatchMetrics for NoopMetrics {
    fn record_request(&self, _event: DispatchMetricEvent) {}

    fn record_latency(&self, _event: DispatchMetricEvent, _latency: Duration) {}
}
