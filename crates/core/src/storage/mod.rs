// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable collections backing the operation queue and the conflict store.
//!
//! The sync engine only ever reads or replaces a whole collection snapshot,
//! so a backend needs two calls: [`Collection::load`] and
//! [`Collection::save`]. Records are addressable by [`Record::record_id`].
//!
//! Backends:
//! - [`JsonlCollection`]: one JSON record per line, replaced atomically
//! - [`SqliteCollection`]: rows keyed by `(collection, id)` in a SQLite file
//! - [`MemoryCollection`]: shared in-memory vector, for tests and embedding

mod jsonl;
mod memory;
mod sqlite;

pub use jsonl::{read_all, write_all, JsonlCollection};
pub use memory::MemoryCollection;
pub use sqlite::SqliteCollection;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::conflict::Conflict;
use crate::error::Result;
use crate::operation::Operation;

/// A record stored in a [`Collection`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Stable id the record is addressed by.
    fn record_id(&self) -> &str;
}

impl Record for Operation {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Conflict {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// An ordered, durable collection of records.
///
/// `save` replaces the whole snapshot and must be durable when it returns.
/// A failed `save` leaves the previous snapshot intact.
pub trait Collection<T: Record>: Send {
    /// Load the persisted snapshot in stored order. Missing storage is empty.
    fn load(&self) -> Result<Vec<T>>;

    /// Replace the persisted snapshot.
    fn save(&mut self, records: &[T]) -> Result<()>;
}

impl<T: Record> Collection<T> for Box<dyn Collection<T>> {
    fn load(&self) -> Result<Vec<T>> {
        (**self).load()
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        (**self).save(records)
    }
}
