// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    /// Overrides the state directory.
    pub const RESYNC_STATE_DIR: &str = "RESYNC_STATE_DIR";
    /// `tracing` filter directives for the binary.
    pub const RESYNC_LOG: &str = "RESYNC_LOG";
    /// Default name of the variable holding the remote bearer token.
    pub const RESYNC_TOKEN: &str = "RESYNC_TOKEN";
    pub const NO_COLOR: &str = "NO_COLOR";
    pub const COLOR: &str = "COLOR";
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

/// Returns the value of `RESYNC_STATE_DIR` if set and non-empty.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(vars::RESYNC_STATE_DIR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the `RESYNC_LOG` filter directives if set.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::RESYNC_LOG).ok()
}

/// Reads a secret from the named variable; empty values count as unset.
pub fn secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
