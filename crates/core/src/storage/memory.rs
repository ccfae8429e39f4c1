// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collection.

use std::sync::{Arc, Mutex, PoisonError};

use super::{Collection, Record};
use crate::error::Result;

/// A [`Collection`] held in memory.
///
/// Clones share the same storage, so a test can keep one handle to inspect
/// what was persisted or to reopen a queue as if the process restarted.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    records: Arc<Mutex<Vec<T>>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        MemoryCollection {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> MemoryCollection<T> {
    /// Returns a copy of the last saved snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        MemoryCollection {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> for MemoryCollection<T> {
    fn load(&self) -> Result<Vec<T>> {
        Ok(self.snapshot())
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        let mut stored = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = records.to_vec();
        Ok(())
    }
}
