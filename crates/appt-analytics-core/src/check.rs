// crates/appt-analytics-core/src/check.rs
// ============================================================================
// Module: Property-Check Registry
// Description: Explicit registry of named property checks with typed outcomes.
// Purpose: Replace dynamic test invocation with enum-dispatched results.
// Dependencies: crate::dispatch, crate::handler, crate::summary, thiserror
// ============================================================================

//! ## Overview
//! The check registry holds named property cases as explicit function
//! references. Running a case yields a typed [`CheckOutcome`]: `Passed` for a
//! truthy result, `Failed` for a falsy result, and `Error` carrying the
//! message of any failure raised during execution. Unknown case names are
//! reported distinctly (`None`) rather than as an outcome.
//! Invariants:
//! - Case execution never panics across the registry boundary; failures are
//!   converted into `Error` outcomes.
//! - Registry iteration order is deterministic (name order).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use thiserror::Error;

use crate::dispatch::DATA_ENTRY_POINT;
use crate::dispatch::DispatchTable;
use crate::dispatch::EntryPointName;
use crate::handler::AnalyticsError;
use crate::handler::AnalyticsHandler;
use crate::handler::AnalyticsRequest;
use crate::handler::AnalyticsResponse;
use crate::summary::StatusBreakdown;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the built-in summary-total property case.
pub const SUMMARY_TOTAL_CASE: &str = "summary_counts_preserve_total";
/// Name of the built-in dispatch-suppression property case.
pub const DISPATCH_SUPPRESSION_CASE: &str = "dispatch_skips_unregistered_entries";

// ============================================================================
// SECTION: Case Names
// ============================================================================

/// Opaque name of a registered property case.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseName(String);

impl CaseName {
    /// Creates a new case name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the case name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Case Errors
// ============================================================================

/// Errors raised by a property case during execution.
///
/// # Invariants
/// - The message is safe for display in runner diagnostics.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The case could not complete its check.
    #[error("{0}")]
    Execution(String),
}

// ============================================================================
// SECTION: Check Outcome
// ============================================================================

/// Typed result of running a property case.
///
/// # Invariants
/// - `Error` carries the originating failure message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The case returned a truthy result.
    Passed,
    /// The case returned a falsy result.
    Failed,
    /// The case raised a failure while executing.
    Error(String),
}

impl CheckOutcome {
    /// Converts a case result into a typed outcome.
    #[must_use]
    pub fn from_result(result: Result<bool, CaseError>) -> Self {
        match result {
            Ok(true) => Self::Passed,
            Ok(false) => Self::Failed,
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Property Cases
// ============================================================================

/// Explicit function reference executed by a property case.
pub type CaseFn = fn() -> Result<bool, CaseError>;

/// A named property case held by the registry.
///
/// # Invariants
/// - `run` is a plain function reference; no dynamic name lookup occurs.
#[derive(Debug, Clone)]
pub struct PropertyCase {
    /// Registered case name.
    name: CaseName,
    /// Check function executed for the case.
    run: CaseFn,
}

impl PropertyCase {
    /// Creates a property case from a name and check function.
    #[must_use]
    pub const fn new(name: CaseName, run: CaseFn) -> Self {
        Self {
            name,
            run,
        }
    }

    /// Returns the registered case name.
    #[must_use]
    pub const fn name(&self) -> &CaseName {
        &self.name
    }

    /// Executes the case and converts the result into a typed outcome.
    #[must_use]
    pub fn execute(&self) -> CheckOutcome {
        CheckOutcome::from_result((self.run)())
    }
}

// ============================================================================
// SECTION: Case Registry
// ============================================================================

/// Explicit registry of property cases keyed by name.
///
/// # Invariants
/// - At most one case is registered per name; re-registration replaces the
///   previous case.
#[derive(Debug, Default)]
pub struct CaseRegistry {
    /// Registered cases keyed by case name.
    cases: BTreeMap<CaseName, PropertyCase>,
}

impl CaseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property case under its name.
    pub fn register(&mut self, case: PropertyCase) {
        self.cases.insert(case.name().clone(), case);
    }

    /// Returns the registered case names in deterministic order.
    #[must_use]
    pub fn names(&self) -> Vec<CaseName> {
        self.cases.keys().cloned().collect()
    }

    /// Runs the named case, returning `None` when the name is unregistered.
    #[must_use]
    pub fn run(&self, name: &CaseName) -> Option<CheckOutcome> {
        self.cases.get(name).map(PropertyCase::execute)
    }

    /// Runs every registered case in deterministic order.
    #[must_use]
    pub fn run_all(&self) -> Vec<(CaseName, CheckOutcome)> {
        self.cases.values().map(|case| (case.name().clone(), case.execute())).collect()
    }
}

/// Builds the registry preloaded with the built-in property cases.
#[must_use]
pub fn builtin_registry() -> CaseRegistry {
    let mut registry = CaseRegistry::new();
    registry.register(PropertyCase::new(
        CaseName::new(SUMMARY_TOTAL_CASE),
        summary_counts_preserve_total,
    ));
    registry.register(PropertyCase::new(
        CaseName::new(DISPATCH_SUPPRESSION_CASE),
        dispatch_skips_unregistered_entries,
    ));
    registry
}

// ============================================================================
// SECTION: Built-In Cases
// ============================================================================

/// Checks that summary per-status counts always sum to the total.
fn summary_counts_preserve_total() -> Result<bool, CaseError> {
    let samples: &[&[&str]] = &[
        &[],
        &["booked"],
        &["booked", "booked", "cancelled"],
        &["booked", "cancelled", "completed", "no_show", "booked"],
        &["completed"; 32],
    ];
    for statuses in samples {
        let breakdown = StatusBreakdown::from_statuses(statuses.iter().copied());
        let summed: u64 = breakdown.counts.values().sum();
        let expected = u64::try_from(statuses.len())
            .map_err(|err| CaseError::Execution(err.to_string()))?;
        if summed != breakdown.total || breakdown.total != expected {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Counting probe handler used by the dispatch-suppression case.
#[derive(Debug, Default)]
struct CountingProbe {
    /// Number of times the probe handler was invoked.
    calls: AtomicUsize,
}

impl AnalyticsHandler for CountingProbe {
    fn handle(&self, _request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalyticsResponse::ok(serde_json::Value::Null))
    }
}

/// Checks that dispatch suppresses handlers for unregistered entry points.
fn dispatch_skips_unregistered_entries() -> Result<bool, CaseError> {
    let probe = Arc::new(CountingProbe::default());
    let table = DispatchTable::data_table(Arc::<CountingProbe>::clone(&probe));
    let request = AnalyticsRequest::new("ping", serde_json::Value::Null);

    for name in ["", "index", "Data", "data.php", "analytics"] {
        let outcome = table
            .dispatch(&EntryPointName::new(name), &request)
            .map_err(|err| CaseError::Execution(err.to_string()))?;
        if outcome.is_handled() {
            return Ok(false);
        }
    }
    if probe.calls.load(Ordering::SeqCst) != 0 {
        return Ok(false);
    }

    let outcome = table
        .dispatch(&EntryPointName::new(DATA_ENTRY_POINT), &request)
        .map_err(|err| CaseError::Execution(err.to_string()))?;
    Ok(outcome.is_handled() && probe.calls.load(Ordering::SeqCst) == 1)
}
