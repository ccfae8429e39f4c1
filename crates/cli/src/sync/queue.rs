// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered queue of pending mutations.
//!
//! Every mutating call persists the full snapshot through the backing
//! [`Collection`] before returning; when the save fails the in-memory state
//! is left untouched. Expected states (unknown id, nothing eligible) are
//! `None`/`false`, never errors. Errors are storage failures only.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use resync_core::{
    Collection, EntityType, NewOperation, Operation, OperationStatus, Result,
};

/// Completed operations kept in memory for `list_by_status(Completed)`.
const COMPLETED_HISTORY: usize = 100;

/// Outcome of a failed sync attempt, as recorded by [`OperationQueue::mark_failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Retries the executor spent on this attempt.
    pub retries_used: u32,
    /// Whether the failure class was retryable at all.
    pub retryable: bool,
    pub message: String,
}

/// Persisted, ordered list of operations.
pub struct OperationQueue {
    ops: Vec<Operation>,
    store: Box<dyn Collection<Operation>>,
    max_retries: u32,
    completed: VecDeque<Operation>,
}

impl OperationQueue {
    /// Load the queue from `store`.
    ///
    /// Operations left `syncing` by a crash go back to `pending`; completed
    /// leftovers are dropped.
    pub fn open(store: Box<dyn Collection<Operation>>, max_retries: u32) -> Result<Self> {
        let loaded = store.load()?;
        let before = loaded.len();
        let mut recovered = 0usize;

        let ops: Vec<Operation> = loaded
            .into_iter()
            .filter(|op| op.status != OperationStatus::Completed)
            .map(|mut op| {
                if op.status == OperationStatus::Syncing {
                    op.status = OperationStatus::Pending;
                    recovered += 1;
                }
                op
            })
            .collect();

        let mut queue = OperationQueue {
            ops,
            store,
            max_retries,
            completed: VecDeque::new(),
        };

        if recovered > 0 || queue.ops.len() != before {
            tracing::info!(recovered, "recovered interrupted operations");
            queue.store.save(&queue.ops)?;
        }

        Ok(queue)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Apply `f` to a copy of the operations and persist it.
    ///
    /// `f` returns `None` to signal "nothing to do"; nothing is saved then.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<Operation>) -> Option<R>) -> Result<Option<R>> {
        let mut next = self.ops.clone();
        let Some(out) = f(&mut next) else {
            return Ok(None);
        };
        self.store.save(&next)?;
        self.ops = next;
        Ok(Some(out))
    }

    /// Append a new `pending` operation.
    pub fn enqueue(&mut self, intent: NewOperation) -> Result<Operation> {
        let op = Operation::new(intent, Utc::now())?;
        let stored = op.clone();
        self.mutate(move |ops| {
            ops.push(stored);
            Some(())
        })?;
        tracing::debug!(op_id = %op.id, entity = %op.entity_key(), kind = %op.kind, "enqueued");
        Ok(op)
    }

    /// Insert a corrective operation ahead of any queued work on its entity.
    ///
    /// Falls back to appending when the entity has nothing queued.
    pub fn enqueue_corrective(&mut self, intent: NewOperation) -> Result<Operation> {
        let op = Operation::new(intent, Utc::now())?;
        let stored = op.clone();
        self.mutate(move |ops| {
            let position = ops
                .iter()
                .position(|o| {
                    !o.status.is_terminal() && o.targets(&stored.entity_type, &stored.entity_id)
                })
                .unwrap_or(ops.len());
            ops.insert(position, stored);
            Some(())
        })?;
        tracing::debug!(op_id = %op.id, entity = %op.entity_key(), kind = %op.kind, "enqueued corrective");
        Ok(op)
    }

    /// Oldest `pending` operation that may be attempted now.
    pub fn dequeue_next(&self) -> Option<Operation> {
        self.next_eligible(|_| true)
    }

    /// Like [`dequeue_next`](Self::dequeue_next), with an extra filter.
    ///
    /// Only the first non-terminal operation of each entity is a candidate,
    /// so a `syncing` operation or an earlier `pending` one holds back later
    /// work on the same entity. An operation rejected by `filter` holds back
    /// its entity too.
    pub fn next_eligible(&self, filter: impl Fn(&Operation) -> bool) -> Option<Operation> {
        let mut seen = HashSet::new();
        for op in &self.ops {
            if op.status.is_terminal() {
                continue;
            }
            if !seen.insert(op.entity_key()) {
                continue;
            }
            if op.status == OperationStatus::Pending && filter(op) {
                return Some(op.clone());
            }
        }
        None
    }

    /// `pending → syncing`. False if the operation is unknown, not pending,
    /// or its entity already has an operation in flight.
    pub fn mark_syncing(&mut self, id: &str) -> Result<bool> {
        let updated = self.mutate(|ops| {
            let idx = ops
                .iter()
                .position(|o| o.id == id && o.status == OperationStatus::Pending)?;
            let in_flight = ops.iter().any(|o| {
                o.status == OperationStatus::Syncing
                    && o.targets(&ops[idx].entity_type, &ops[idx].entity_id)
            });
            if in_flight {
                return None;
            }
            ops[idx].status = OperationStatus::Syncing;
            Some(())
        })?;
        Ok(updated.is_some())
    }

    /// Remove a synced operation.
    pub fn mark_completed(&mut self, id: &str) -> Result<Option<Operation>> {
        let removed = self.mutate(|ops| {
            let idx = ops.iter().position(|o| o.id == id)?;
            Some(ops.remove(idx))
        })?;

        Ok(removed.map(|mut op| {
            op.status = OperationStatus::Completed;
            if self.completed.len() == COMPLETED_HISTORY {
                self.completed.pop_front();
            }
            self.completed.push_back(op.clone());
            op
        }))
    }

    /// Record a failed attempt.
    ///
    /// Adds the retries spent to `retryCount` (at least one for a retryable
    /// failure) and stamps `lastRetry`/`lastError`. The operation goes back
    /// to `pending` if the failure was retryable and the budget is not yet
    /// spent; otherwise it freezes as `failed` until retried by hand.
    pub fn mark_failed(&mut self, id: &str, failure: &Failure) -> Result<Option<Operation>> {
        let max_retries = self.max_retries;
        let now = Utc::now();
        self.mutate(|ops| {
            let op = ops.iter_mut().find(|o| o.id == id && !o.status.is_terminal())?;
            let spent = if failure.retryable {
                failure.retries_used.max(1)
            } else {
                failure.retries_used
            };
            op.retry_count = op.retry_count.saturating_add(spent);
            op.last_retry = Some(now);
            op.last_error = Some(failure.message.clone());
            op.status = if failure.retryable && op.retry_count < max_retries {
                OperationStatus::Pending
            } else {
                OperationStatus::Failed
            };
            Some(op.clone())
        })
    }

    /// `syncing → pending` without touching retry bookkeeping.
    pub fn revert_pending(&mut self, id: &str) -> Result<bool> {
        let updated = self.mutate(|ops| {
            let op = ops
                .iter_mut()
                .find(|o| o.id == id && o.status == OperationStatus::Syncing)?;
            op.status = OperationStatus::Pending;
            Some(())
        })?;
        Ok(updated.is_some())
    }

    /// `syncing → pending` after a pass gave up on the operation.
    ///
    /// Unlike [`revert_pending`](Self::revert_pending) the in-memory queue
    /// changes even when persisting fails, so the entity is not held back
    /// for the rest of the session. A `syncing` record left on disk is
    /// recovered by [`open`](Self::open).
    pub fn release(&mut self, id: &str) -> Result<bool> {
        let Some(op) = self
            .ops
            .iter_mut()
            .find(|o| o.id == id && o.status == OperationStatus::Syncing)
        else {
            return Ok(false);
        };
        op.status = OperationStatus::Pending;
        self.store.save(&self.ops)?;
        Ok(true)
    }

    /// `failed → pending` with a fresh retry budget. Keeps queue position.
    pub fn retry(&mut self, id: &str) -> Result<Option<Operation>> {
        self.mutate(|ops| {
            let op = ops
                .iter_mut()
                .find(|o| o.id == id && o.status == OperationStatus::Failed)?;
            op.status = OperationStatus::Pending;
            op.retry_count = 0;
            op.last_error = None;
            Some(op.clone())
        })
    }

    /// Drop an operation by hand. Operations in flight cannot be removed.
    pub fn remove(&mut self, id: &str) -> Result<Option<Operation>> {
        self.mutate(|ops| {
            let idx = ops
                .iter()
                .position(|o| o.id == id && o.status != OperationStatus::Syncing)?;
            Some(ops.remove(idx))
        })
    }

    /// Point later operations on a created entity at its server-assigned id.
    ///
    /// Returns the number of operations rewritten.
    pub fn reassign_entity_id(
        &mut self,
        entity_type: &EntityType,
        provisional: &str,
        assigned: &str,
    ) -> Result<usize> {
        let count = self.mutate(|ops| {
            let mut count = 0;
            for op in ops.iter_mut().filter(|o| o.targets(entity_type, provisional)) {
                op.entity_id = assigned.to_string();
                count += 1;
            }
            (count > 0).then_some(count)
        })?;
        Ok(count.unwrap_or(0))
    }

    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.ops.iter().find(|o| o.id == id)
    }

    /// Queued operations in order (completed ones are not kept).
    pub fn all(&self) -> &[Operation] {
        &self.ops
    }

    /// Operations in `status`. `Completed` reads the in-memory history of
    /// this session.
    pub fn list_by_status(&self, status: OperationStatus) -> Vec<Operation> {
        if status == OperationStatus::Completed {
            return self.completed.iter().cloned().collect();
        }
        self.ops
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    pub fn count(&self, status: OperationStatus) -> usize {
        self.ops.iter().filter(|o| o.status == status).count()
    }

    pub fn pending_count(&self) -> usize {
        self.count(OperationStatus::Pending)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
