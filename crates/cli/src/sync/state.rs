// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync state visible to the scheduler and to read-only observers.
//!
//! Uses atomic fields for lock-free reads from presentation code while a
//! pass is running.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use resync_core::SyncStatus;

/// Status values for the atomic status field.
pub const STATE_IDLE: u8 = 0;
pub const STATE_SYNCING: u8 = 1;
pub const STATE_ERROR: u8 = 2;

fn encode(status: SyncStatus) -> u8 {
    match status {
        SyncStatus::Idle => STATE_IDLE,
        SyncStatus::Syncing => STATE_SYNCING,
        SyncStatus::Error => STATE_ERROR,
    }
}

fn decode(value: u8) -> SyncStatus {
    match value {
        STATE_SYNCING => SyncStatus::Syncing,
        STATE_ERROR => SyncStatus::Error,
        _ => SyncStatus::Idle,
    }
}

/// `syncStatus`, `isOnline` and pass progress.
pub struct SharedSyncState {
    status: AtomicU8,
    online: AtomicBool,
    /// Percentage, 0–100.
    progress: AtomicU8,
}

impl SharedSyncState {
    /// Create a new state: idle and offline.
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(STATE_IDLE),
            online: AtomicBool::new(false),
            progress: AtomicU8::new(0),
        }
    }

    pub fn status(&self) -> SyncStatus {
        decode(self.status.load(Ordering::Acquire))
    }

    pub fn set_status(&self, status: SyncStatus) {
        self.status.store(encode(status), Ordering::Release);
    }

    /// Enter `syncing` unless a pass is already running.
    ///
    /// Returns false when the gate is closed; overlapping passes are rejected.
    pub fn try_begin_pass(&self) -> bool {
        let mut current = self.status.load(Ordering::Acquire);
        loop {
            if current == STATE_SYNCING {
                return false;
            }
            match self.status.compare_exchange(
                current,
                STATE_SYNCING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.progress.store(0, Ordering::Release);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Set the connectivity flag. Returns the previous value.
    pub fn set_online(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::AcqRel)
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    /// Raise progress to `percent` (capped at 100). Never lowers it.
    ///
    /// Returns true if the stored value changed.
    pub fn advance_progress(&self, percent: u8) -> bool {
        let percent = percent.min(100);
        self.progress.fetch_max(percent, Ordering::AcqRel) < percent
    }
}

impl Default for SharedSyncState {
    fn default() -> Self {
        Self::new()
    }
}
