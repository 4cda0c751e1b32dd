// crates/appt-analytics-core/tests/proptest_dispatch.rs
// ============================================================================
// Module: Dispatch Property-Based Tests
// Description: Property tests for entry-point dispatch suppression.
// Purpose: Ensure handlers stay unreachable for arbitrary foreign names.
// ============================================================================

//! Property-based tests for dispatch suppression invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use appt_analytics_core::AnalyticsError;
use appt_analytics_core::AnalyticsHandler;
use appt_analytics_core::AnalyticsRequest;
use appt_analytics_core::AnalyticsResponse;
use appt_analytics_core::DATA_ENTRY_POINT;
use appt_analytics_core::DispatchTable;
use appt_analytics_core::EntryPointName;
use proptest::prelude::*;
use serde_json::Value;

struct CountingHandler {
    calls: AtomicUsize,
}

impl AnalyticsHandler for CountingHandler {
    fn handle(&self, _request: &AnalyticsRequest) -> Result<AnalyticsResponse, AnalyticsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalyticsResponse::ok(Value::Null))
    }
}

proptest! {
    #[test]
    fn foreign_names_never_invoke_the_handler(names in prop::collection::vec(".*", 0 .. 16)) {
        let handler = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });
        let table = DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>);
        let request = AnalyticsRequest::new("ping", Value::Null);

        for name in names {
            prop_assume!(name != DATA_ENTRY_POINT);
            let outcome = table
                .dispatch(&EntryPointName::new(name), &request)
                .expect("dispatch of foreign names must not fail");
            prop_assert!(!outcome.is_handled());
        }
        prop_assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispatch_count_matches_targeted_dispatches(hits in 0_usize .. 8) {
        let handler = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });
        let table = DispatchTable::data_table(Arc::clone(&handler) as Arc<dyn AnalyticsHandler>);
        let request = AnalyticsRequest::new("ping", Value::Null);

        for _ in 0 .. hits {
            let outcome = table
                .dispatch(&EntryPointName::new(DATA_ENTRY_POINT), &request)
                .expect("targeted dispatch must succeed");
            prop_assert!(outcome.is_handled());
        }
        prop_assert_eq!(handler.calls.load(Ordering::SeqCst), hits);
    }
}
