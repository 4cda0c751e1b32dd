// crates/appt-analytics-core/src/lib.rs
// ============================================================================
// Module: Appointment Analytics Core Library
// Description: Dispatch table, handler contract, and property-check registry.
// Purpose: Provide the typed entry-point and self-check seams for the service.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Appointment Analytics Core defines the [`AnalyticsHandler`] collaborator
//! contract, the explicit [`DispatchTable`] that replaces ambient entry-point
//! inspection, the built-in [`AppointmentSummaryService`], and the
//! [`CaseRegistry`] of property checks with typed [`CheckOutcome`] results.
//! Invariants:
//! - Dispatch invokes a handler only for its registered entry-point name.
//! - Check outcomes are explicit values; no check raises across the registry
//!   boundary.
//!
//! Security posture: request envelopes are untrusted input; handlers must
//! validate params and fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod check;
pub mod dispatch;
pub mod handler;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use check::CaseError;
pub use check::CaseFn;
pub use check::CaseName;
pub use check::CaseRegistry;
pub use check::CheckOutcome;
pub use check::DISPATCH_SUPPRESSION_CASE;
pub use check::PropertyCase;
pub use check::SUMMARY_TOTAL_CASE;
pub use check::builtin_registry;
pub use dispatch::DATA_ENTRY_POINT;
pub use dispatch::DispatchError;
pub use dispatch::DispatchOutcome;
pub use dispatch::DispatchTable;
pub use dispatch::EntryPointName;
pub use handler::AnalyticsError;
pub use handler::AnalyticsHandler;
pub use handler::AnalyticsRequest;
pub use handler::AnalyticsResponse;
pub use handler::ResponseStatus;
pub use summary::ACTION_PING;
pub use summary::ACTION_SUMMARY;
pub use summary::AppointmentSummaryService;
pub use summary::MAX_SUMMARY_RECORDS;
pub use summary::StatusBreakdown;
