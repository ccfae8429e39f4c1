// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change notifications for the presentation layer.

use resync_core::{EntityType, Resolution, SyncStatus};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Something observable changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    QueueChanged {
        pending: usize,
        syncing: usize,
        failed: usize,
    },
    ConflictsChanged {
        unresolved: usize,
    },
    SyncProgress {
        percent: u8,
    },
    StatusChanged {
        status: SyncStatus,
        is_online: bool,
    },
    /// A created entity received its server-assigned id.
    EntityReconciled {
        entity_type: EntityType,
        provisional_id: String,
        entity_id: String,
    },
    /// A conflict was settled; `canonical` is the state the local replica
    /// should now hold.
    ConflictResolved {
        conflict_id: String,
        entity_type: EntityType,
        entity_id: String,
        resolution: Resolution,
        canonical: Option<Value>,
    },
    /// The remote rejected our credentials; sync pauses until refreshed.
    AuthenticationRequired {
        operation_id: String,
    },
}

/// Fan-out of [`SyncEvent`]s. Sending with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        EventBus { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SyncEvent) {
        tracing::trace!(?event, "event");
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
