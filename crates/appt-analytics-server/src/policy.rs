// crates/appt-analytics-server/src/policy.rs
// ============================================================================
// Module: Serve Bind Policy
// Description: Loopback-only bind enforcement with explicit opt-in.
// Purpose: Fail closed before any non-loopback socket is opened.
// Dependencies: crate::config, thiserror
// ============================================================================

//! ## Overview
//! The bind policy refuses non-loopback addresses unless the operator opts
//! in via `--allow-non-loopback` or `APPT_ANALYTICS_ALLOW_NON_LOOPBACK=1`.
//! Enforcement runs before any socket is opened.
//!
//! Security posture: local-only is the default; network exposure requires an
//! explicit, auditable opt-in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::AppConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable opting in to non-loopback binds.
pub const ALLOW_NON_LOOPBACK_ENV: &str = "APPT_ANALYTICS_ALLOW_NON_LOOPBACK";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by bind policy enforcement.
///
/// # Invariants
/// - Messages name the offending bind or env value for operator display.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configured bind address did not parse.
    #[error("invalid bind address {bind}: {error}")]
    BindParse {
        /// Configured bind value.
        bind: String,
        /// Underlying parse error text.
        error: String,
    },
    /// The bind is non-loopback and no opt-in was provided.
    #[error(
        "refusing to bind to non-loopback address {bind}; set --allow-non-loopback or \
         APPT_ANALYTICS_ALLOW_NON_LOOPBACK=1 to opt in"
    )]
    NonLoopback {
        /// Refused bind address.
        bind: String,
    },
    /// The opt-in environment variable held an unparseable value.
    #[error(
        "invalid value for APPT_ANALYTICS_ALLOW_NON_LOOPBACK: {value}; expected \
         true/false/1/0/yes/no/on/off"
    )]
    AllowEnvInvalid {
        /// Rejected environment value.
        value: String,
    },
}

// ============================================================================
// SECTION: Bind Outcome
// ============================================================================

/// Result of bind policy enforcement.
///
/// # Invariants
/// - `network_exposed` is true only when a non-loopback bind was explicitly
///   allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOutcome {
    /// Address the server may bind to.
    pub addr: SocketAddr,
    /// Whether the bind exposes the server beyond loopback.
    pub network_exposed: bool,
}

// ============================================================================
// SECTION: Enforcement
// ============================================================================

/// Resolves the non-loopback opt-in from the CLI flag or environment.
///
/// # Errors
///
/// Returns [`PolicyError::AllowEnvInvalid`] when the env value is not a
/// recognized boolean literal.
pub fn resolve_allow_non_loopback(flag: bool) -> Result<bool, PolicyError> {
    if flag {
        return Ok(true);
    }
    match std::env::var(ALLOW_NON_LOOPBACK_ENV) {
        Ok(value) => parse_bool_flag(&value).ok_or(PolicyError::AllowEnvInvalid {
            value,
        }),
        Err(_) => Ok(false),
    }
}

/// Enforces the loopback-only bind policy against the config.
///
/// # Errors
///
/// Returns [`PolicyError`] when the bind does not parse or is non-loopback
/// without an opt-in.
pub fn enforce_local_only(
    config: &AppConfig,
    allow_non_loopback: bool,
) -> Result<BindOutcome, PolicyError> {
    let addr: SocketAddr = config.server.bind.parse().map_err(|err| PolicyError::BindParse {
        bind: config.server.bind.clone(),
        error: format!("{err}"),
    })?;
    let loopback = addr.ip().is_loopback();
    if !loopback && !allow_non_loopback {
        return Err(PolicyError::NonLoopback {
            bind: config.server.bind.clone(),
        });
    }
    Ok(BindOutcome {
        addr,
        network_exposed: !loopback,
    })
}

/// Parses a permissive boolean literal.
fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
