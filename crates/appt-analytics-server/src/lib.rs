// crates/appt-analytics-server/src/lib.rs
// ============================================================================
// Module: Appointment Analytics Server Library
// Description: HTTP surface, config, and bind policy for the data endpoint.
// Purpose: Expose the dispatch table over loopback-safe HTTP.
// Dependencies: appt-analytics-core, axum, serde, thiserror, tokio, toml
// ============================================================================

//! ## Overview
//! The server crate exposes the core dispatch table over HTTP: `POST /data`
//! routes request envelopes through the registered analytics handler and
//! `GET /health` reports liveness. Config is loaded from TOML with safe
//! defaults, and the bind policy refuses non-loopback addresses unless the
//! operator explicitly opts in.
//! Invariants:
//! - Unknown paths never invoke the analytics handler.
//! - Non-loopback binds fail closed before any socket is opened.
//!
//! Security posture: request bodies are untrusted and size-capped.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod policy;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AppConfig;
pub use config::ConfigError;
pub use config::ServerConfig;
pub use policy::ALLOW_NON_LOOPBACK_ENV;
pub use policy::BindOutcome;
pub use policy::PolicyError;
pub use policy::enforce_local_only;
pub use policy::resolve_allow_non_loopback;
pub use server::AnalyticsServer;
pub use server::DATA_PATH;
pub use server::HEALTH_PATH;
pub use server::ServerError;
pub use telemetry::DispatchMetricEvent;
pub use telemetry::DispatchMetrics;
pub use telemetry::DispatchOutcomeLabel;
pub use telemetry::NoopMetrics;
