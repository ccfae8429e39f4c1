// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync engine.
//!
//! Records local mutations while disconnected and replays them against the
//! remote source of truth once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncEngine  │────►│    Retry    │────►│   Remote    │
//! │ (scheduler) │◄────│  executor   │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!    │       │
//!    ▼       ▼
//! ┌───────┐ ┌──────────────┐     ┌──────────┐
//! │ Queue │ │ConflictStore │◄────│ Resolver │
//! └───────┘ └──────────────┘     └──────────┘
//! ```
//!
//! # Features
//!
//! - Persisted operation queue with per-entity ordering
//! - Exponential backoff with jitter, cancelled when connectivity drops
//! - Conflict detection on version mismatch, whole-record resolution
//! - Provisional ids reconciled with server-assigned ids
//! - Injectable remote trait for testing

mod conflicts;
mod events;
mod http;
mod queue;
mod remote;
mod resolver;
mod retry;
mod scheduler;
mod state;

pub use conflicts::ConflictStore;
pub use events::{EventBus, SyncEvent};
pub use http::HttpRemote;
pub use queue::{Failure, OperationQueue};
pub use remote::{Remote, RemoteAck, RemoteError, RemoteFuture, RemoteResult, Unconfigured};
pub use resolver::{ConflictResolver, ResolveError, Resolved};
pub use retry::{
    Classify, FailureClass, RetryConfig, RetryError, RetryPolicy, RETRYABLE_STATUS_CODES,
};
pub use scheduler::{PassReport, ResolvedConflict, SyncEngine, SyncError, SyncResult};
pub use state::SharedSyncState;

#[cfg(test)]
mod test_helpers;
