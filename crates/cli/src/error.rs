// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{RemoteError, SyncError};

/// All errors surfaced by the resync CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: no state at {0}\n  hint: run 'resync init' first")]
    NotInitialized(String),

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("ambiguous {kind} id '{prefix}' matches: {}", matches.join(", "))]
    AmbiguousId {
        kind: &'static str,
        prefix: String,
        matches: Vec<String>,
    },

    #[error("state directory is in use: {0}\n  hint: another resync process holds the lock")]
    Locked(String),

    #[error("no remote configured\n  hint: set [remote] url in config.toml")]
    NoRemote,

    #[error("sync pass made no progress: {failed} failed, {requeued} requeued")]
    SyncStalled { failed: usize, requeued: usize },

    #[error("authentication required\n  hint: refresh the token named by [remote] token_env")]
    AuthenticationRequired,

    #[error("{0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] resync_core::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
