// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted conflicts awaiting resolution.

use resync_core::{Collection, Conflict, EntityType, Result};

/// Detected conflicts, oldest first. Persists on every mutation.
pub struct ConflictStore {
    conflicts: Vec<Conflict>,
    store: Box<dyn Collection<Conflict>>,
}

impl ConflictStore {
    pub fn open(store: Box<dyn Collection<Conflict>>) -> Result<Self> {
        let conflicts = store.load()?;
        Ok(ConflictStore { conflicts, store })
    }

    fn persist(&mut self, next: Vec<Conflict>) -> Result<()> {
        self.store.save(&next)?;
        self.conflicts = next;
        Ok(())
    }

    pub fn insert(&mut self, conflict: Conflict) -> Result<()> {
        tracing::warn!(
            conflict_id = %conflict.id,
            entity = %conflict.entity_key(),
            "conflict detected"
        );
        let mut next = self.conflicts.clone();
        next.push(conflict);
        self.persist(next)
    }

    /// Replace a stored conflict by id. Returns false if unknown.
    pub fn update(&mut self, conflict: Conflict) -> Result<bool> {
        let mut next = self.conflicts.clone();
        let Some(slot) = next.iter_mut().find(|c| c.id == conflict.id) else {
            return Ok(false);
        };
        *slot = conflict;
        self.persist(next)?;
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn unresolved(&self) -> Vec<Conflict> {
        self.conflicts
            .iter()
            .filter(|c| !c.is_resolved())
            .cloned()
            .collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.conflicts.iter().filter(|c| !c.is_resolved()).count()
    }

    /// True while the entity has an unresolved conflict.
    pub fn is_blocked(&self, entity_type: &EntityType, entity_id: &str) -> bool {
        self.conflicts.iter().any(|c| {
            !c.is_resolved() && c.entity_type == *entity_type && c.entity_id == entity_id
        })
    }

    /// Point conflicts on a created entity at its server-assigned id.
    pub fn reassign_entity_id(
        &mut self,
        entity_type: &EntityType,
        provisional: &str,
        assigned: &str,
    ) -> Result<usize> {
        let mut next = self.conflicts.clone();
        let mut count = 0;
        for conflict in next
            .iter_mut()
            .filter(|c| c.entity_type == *entity_type && c.entity_id == provisional)
        {
            conflict.entity_id = assigned.to_string();
            count += 1;
        }
        if count > 0 {
            self.persist(next)?;
        }
        Ok(count)
    }

    /// Drop resolved conflicts. Returns how many were removed.
    pub fn prune_resolved(&mut self) -> Result<usize> {
        let next: Vec<Conflict> = self
            .conflicts
            .iter()
            .filter(|c| !c.is_resolved())
            .cloned()
            .collect();
        let removed = self.conflicts.len() - next.len();
        if removed > 0 {
            self.persist(next)?;
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}
