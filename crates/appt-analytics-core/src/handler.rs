// crates/appt-analytics-core/src/handler.rs
// ============================================================================
// Module: Analytics Handler Contract
// Description: Request/response envelope and the analytics handler trait.
// Purpose: Define the collaborator seam the dispatcher delegates to.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The analytics handler owns the full request/response cycle for a
//! dispatched entry point: it reads the request envelope, computes a result,
//! and returns a response envelope or a typed error. The envelope is
//! deliberately minimal (an action name plus opaque JSON params); payload
//! shape beyond that is out of scope.
//!
//! Security posture: envelopes arrive from untrusted clients; implementations
//! must validate params and fail closed on unknown actions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Envelope Types
// ============================================================================

/// Analytics request envelope.
///
/// # Invariants
/// - `action` is an opaque label; handlers decide which actions they accept.
/// - `params` defaults to JSON `null` when absent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    /// Requested analytics action.
    pub action: String,
    /// Opaque action parameters.
    #[serde(default)]
    pub params: Value,
}

impl AnalyticsRequest {
    /// Creates a request envelope for the given action and params.
    #[must_use]
    pub fn new(action: impl Into<String>, params: Value) -> Self {
        Self {
            action: action.into(),
            params,
        }
    }
}

/// Response status labels for the analytics envelope.
///
/// # Invariants
/// - Variants are stable wire labels (`ok` / `error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The request was handled successfully.
    Ok,
    /// The request failed; `message` carries the diagnostic.
    Error,
}

impl ResponseStatus {
    /// Returns the stable wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Analytics response envelope.
///
/// # Invariants
/// - `data` is present only for `ok` responses.
/// - `message` is present only for `error` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    /// Response status label.
    pub status: ResponseStatus,
    /// Result payload for successful responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Diagnostic message for failed responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalyticsResponse {
    /// Creates a successful response envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            status: ResponseStatus::Ok,
            data: Some(data),
            message: None,
        }
    }

    /// Creates an error response envelope carrying a diagnostic message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// SECTION: Handler Errors
// ============================================================================

/// Errors emitted by analytics handlers.
///
/// # Invariants
/// - Variants are stable for programmatic handling and HTTP status mapping.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The requested action is not supported by the handler.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// The action params failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),
    /// The analytics computation itself failed.
    #[error("analytics computation failed: {0}")]
    Computation(String),
}

// ============================================================================
// SECTION: Handler Trait
// ============================================================================

/// Handles a dispatched analytics request end to end.
pub trait AnalyticsHandler: Send + Sync {
    /// Computes a response envelope for the request.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] when the action is unknown, the params are
    /// invalid, or the computation fails.
    fn handle(&self, request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError>;
}
