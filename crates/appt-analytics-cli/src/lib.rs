// crates/appt-analytics-cli/src/lib.rs
// ============================================================================
// Module: Appointment Analytics CLI Library
// Description: Shared helpers backing the appt-analytics binary.
// Purpose: Expose the localization catalog to the binary and its tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Library surface for the Appointment Analytics CLI. The binary links
//! against this crate for the i18n catalog and the [`t!`](crate::t) macro.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
