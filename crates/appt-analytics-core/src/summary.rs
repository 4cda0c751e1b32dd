// crates/appt-analytics-core/src/summary.rs
// ============================================================================
// Module: Appointment Summary Service
// Description: Built-in analytics handler aggregating appointment statuses.
// Purpose: Provide a concrete handler behind the dispatch table.
// Dependencies: crate::handler, serde, serde_json
// ============================================================================

//! ## Overview
//! The appointment summary service is the built-in [`AnalyticsHandler`]. It
//! supports a `ping` liveness action and a `summary` action that aggregates
//! appointment status labels submitted in the request params into per-status
//! counts plus a total. No storage is involved: data arrives in the request
//! and only the aggregate is returned.
//! Invariants:
//! - The sum of per-status counts always equals the total record count.
//! - Record counts are capped at [`MAX_SUMMARY_RECORDS`]; oversized inputs
//!   fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::handler::AnalyticsError;
use crate::handler::AnalyticsHandler;
use crate::handler::AnalyticsRequest;
use crate::handler::AnalyticsResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Liveness action accepted by the summary service.
pub const ACTION_PING: &str = "ping";
/// Aggregation action accepted by the summary service.
pub const ACTION_SUMMARY: &str = "summary";
/// Maximum number of status records accepted per summary request.
pub const MAX_SUMMARY_RECORDS: usize = 10_000;

// ============================================================================
// SECTION: Breakdown
// ============================================================================

/// Per-status counts for a set of appointment records.
///
/// # Invariants
/// - `total` equals the sum of all values in `counts`.
/// - Status labels are opaque and not normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    /// Record counts keyed by status label.
    pub counts: BTreeMap<String, u64>,
    /// Total number of records aggregated.
    pub total: u64,
}

impl StatusBreakdown {
    /// Aggregates status labels into per-status counts plus a total.
    #[must_use]
    pub fn from_statuses<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut total = 0_u64;
        for status in statuses {
            *counts.entry(status.into()).or_insert(0) += 1;
            total += 1;
        }
        Self {
            counts,
            total,
        }
    }
}

// ============================================================================
// SECTION: Summary Params
// ============================================================================

/// Params accepted by the `summary` action.
///
/// # Invariants
/// - Unknown fields are rejected to keep the envelope minimal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct SummaryParams {
    /// Status label per submitted appointment record.
    statuses: Vec<String>,
}

// ============================================================================
// SECTION: Service Implementation
// ============================================================================

/// Built-in analytics handler for appointment summaries.
///
/// # Invariants
/// - Supports only the `ping` and `summary` actions.
/// - Fails closed on unknown actions and invalid params.
#[derive(Debug, Default)]
pub struct AppointmentSummaryService;

impl AppointmentSummaryService {
    /// Creates the summary service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AnalyticsHandler for AppointmentSummaryService {
    fn handle(&self, request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError> {
        match request.action.as_str() {
            ACTION_PING => Ok(AnalyticsResponse::ok(json!({ "pong": true }))),
            ACTION_SUMMARY => {
                let params: SummaryParams = serde_json::from_value(request.params.clone())
                    .map_err(|err| AnalyticsError::InvalidParams(err.to_string()))?;
                if params.statuses.len() > MAX_SUMMARY_RECORDS {
                    return Err(AnalyticsError::InvalidParams(format!(
                        "summary accepts at most {MAX_SUMMARY_RECORDS} records (got {})",
                        params.statuses.len()
                    )));
                }
                let breakdown = StatusBreakdown::from_statuses(params.statuses);
                let body = serde_json::to_value(&breakdown)
                    .map_err(|err| AnalyticsError::Computation(err.to_string()))?;
                Ok(AnalyticsResponse::ok(body))
            }
            other => Err(AnalyticsError::UnknownAction(other.to_string())),
        }
    }
}
