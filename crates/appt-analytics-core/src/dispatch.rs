// crates/appt-analytics-core/src/dispatch.rs
// ============================================================================
// Module: Entry-Point Dispatch Table
// Description: Explicit dispatch table mapping entry-point names to handlers.
// Purpose: Invoke a handler only when its entry point is directly targeted.
// Dependencies: crate::handler, thiserror
// ============================================================================

//! ## Overview
//! The dispatch table replaces ambient "current script identity" inspection
//! with explicit entry-point selection. Dispatching a name that is not
//! registered is a no-op ([`DispatchOutcome::NotTargeted`]): no handler is
//! invoked and no side effect occurs. Dispatching a registered name invokes
//! that handler exactly once with the request envelope.
//! Invariants:
//! - Unregistered names never reach a handler.
//! - Handler errors propagate to the caller unmodified; the dispatcher
//!   performs no local recovery.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::handler::AnalyticsError;
use crate::handler::AnalyticsHandler;
use crate::handler::AnalyticsRequest;
use crate::handler::AnalyticsResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Canonical entry-point name for the AJAX data endpoint.
pub const DATA_ENTRY_POINT: &str = "data";

// ============================================================================
// SECTION: Entry-Point Names
// ============================================================================

/// Opaque entry-point name used as the dispatch key.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPointName(String);

impl EntryPointName {
    /// Creates a new entry-point name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the entry-point name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryPointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Dispatch Errors
// ============================================================================

/// Errors emitted by the dispatch table.
///
/// # Invariants
/// - Handler failures carry the originating entry point and source error.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The registered handler failed while handling the request.
    #[error("handler failed for entry point {entry_point}: {source}")]
    Handler {
        /// Entry point whose handler failed.
        entry_point: EntryPointName,
        /// Underlying handler error.
        #[source]
        source: AnalyticsError,
    },
}

// ============================================================================
// SECTION: Dispatch Outcome
// ============================================================================

/// Result of dispatching an entry-point name.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The name matched a registered entry point and the handler produced a
    /// response.
    Handled(AnalyticsResponse),
    /// The name matched no registered entry point; no handler was invoked.
    NotTargeted,
}

impl DispatchOutcome {
    /// Returns true when a handler produced a response.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

// ============================================================================
// SECTION: Dispatch Table
// ============================================================================

/// Explicit dispatch table keyed by entry-point name.
///
/// # Invariants
/// - At most one handler is registered per entry-point name; re-registration
///   replaces the previous handler.
#[derive(Default)]
pub struct DispatchTable {
    /// Registered handlers keyed by entry-point name.
    entries: BTreeMap<EntryPointName, Arc<dyn AnalyticsHandler>>,
}

impl DispatchTable {
    /// Creates an empty dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with `handler` registered under [`DATA_ENTRY_POINT`].
    #[must_use]
    pub fn data_table(handler: Arc<dyn AnalyticsHandler>) -> Self {
        let mut table = Self::new();
        table.register(EntryPointName::new(DATA_ENTRY_POINT), handler);
        table
    }

    /// Registers a handler under an explicit entry-point name.
    pub fn register(&mut self, name: EntryPointName, handler: Arc<dyn AnalyticsHandler>) {
        self.entries.insert(name, handler);
    }

    /// Returns true when a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &EntryPointName) -> bool {
        self.entries.contains_key(name)
    }

    /// Dispatches `request` to the handler registered under `name`.
    ///
    /// Returns [`DispatchOutcome::NotTargeted`] without invoking any handler
    /// when `name` is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Handler`] when the registered handler fails;
    /// the error propagates unmodified.
    pub fn dispatch(
        &self,
        name: &EntryPointName,
        request: &AnalyticsRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(handler) = self.entries.get(name) else {
            return Ok(DispatchOutcome::NotTargeted);
        };
        let response = handler.handle(request).map_err(|source| DispatchError::Handler {
            entry_point: name.clone(),
            source,
        })?;
        Ok(DispatchOutcome::Handled(response))
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("entry_points", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
