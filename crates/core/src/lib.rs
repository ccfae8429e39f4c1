// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! resync-core: Shared data model for the resync offline sync engine
//!
//! This crate provides the records the engine queues and persists
//! (operations, conflicts), identifier generation, and the durable
//! collection backends they are stored in.

pub mod conflict;
pub mod entity;
pub mod error;
pub mod id;
pub mod operation;
pub mod patch;
pub mod snapshot;
pub mod storage;

pub use conflict::{Conflict, Resolution};
pub use entity::{EntityKey, EntityType};
pub use error::{Error, Result};
pub use operation::{NewOperation, Operation, OperationKind, OperationStatus};
pub use snapshot::{StateSnapshot, SyncStatus};
pub use storage::{Collection, JsonlCollection, MemoryCollection, Record, SqliteCollection};
