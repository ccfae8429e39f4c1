// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for resync-core operations.

use thiserror::Error;

/// All possible errors that can occur in resync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "invalid operation type: '{0}'\n  hint: valid types are: create, update, delete"
    )]
    InvalidOperationKind(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: pending, syncing, completed, failed")]
    InvalidStatus(String),

    #[error("invalid resolution: '{0}'\n  hint: valid resolutions are: local, remote, merge, manual")]
    InvalidResolution(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for resync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
