// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic export of the full queue and conflict state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conflict::Conflict;
use crate::operation::{Operation, OperationStatus};

/// Scheduler state: `idle → syncing → (idle | error)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Idle,
    Syncing,
    /// The last pass could not make progress.
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only snapshot of the engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub exported_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
    pub is_online: bool,
    /// Progress of the current or last pass, 0–100.
    pub progress: u8,
    pub operations: Vec<Operation>,
    pub conflicts: Vec<Conflict>,
}

impl StateSnapshot {
    /// Number of operations with the given status.
    pub fn count(&self, status: OperationStatus) -> usize {
        self.operations.iter().filter(|op| op.status == status).count()
    }

    /// Number of conflicts still awaiting resolution.
    pub fn unresolved_conflicts(&self) -> usize {
        self.conflicts.iter().filter(|c| !c.is_resolved()).count()
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
