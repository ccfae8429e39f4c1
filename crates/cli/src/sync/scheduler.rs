// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: owns the queue, the conflict store and the sync state,
//! and replays queued operations against the remote.
//!
//! A pass drains the queue one operation at a time:
//!
//! ```text
//! next_eligible ──► mark_syncing ──► retry executor ──► remote.apply
//!                                          │
//!          ┌───────────────┬───────────────┼──────────────┬─────────────┐
//!          ▼               ▼               ▼              ▼             ▼
//!       success         conflict       exhausted      rejected     cancelled/401
//!    mark_completed  store conflict   mark_failed    mark_failed   revert_pending
//!                    mark_completed   (retryable)    (terminal)    stop the pass
//! ```
//!
//! Passes never overlap: entry is gated by a compare-and-swap on the sync
//! status. Queue and conflict locks are never held across an `.await`, and
//! when both are taken the queue is locked first.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use resync_core::{
    Conflict, NewOperation, Operation, OperationKind, OperationStatus, Resolution,
    StateSnapshot, SyncStatus,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::conflicts::ConflictStore;
use super::events::{EventBus, SyncEvent};
use super::queue::{Failure, OperationQueue};
use super::remote::{Remote, RemoteAck, RemoteError};
use super::resolver::{ConflictResolver, ResolveError};
use super::retry::{RetryError, RetryPolicy};
use super::state::SharedSyncState;

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Storage(#[from] resync_core::Error),

    #[error("a sync pass is already running")]
    AlreadySyncing,

    #[error("offline\n  hint: operations stay queued until connectivity returns")]
    Offline,

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Summary of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    /// Pending operations when the pass started.
    pub total: usize,
    pub completed: usize,
    /// Operations superseded by a new conflict.
    pub conflicted: usize,
    /// Operations frozen as `failed`.
    pub failed: usize,
    /// Operations that failed but went back to `pending`.
    pub requeued: usize,
    /// Connectivity dropped during the pass.
    pub interrupted: bool,
    pub authentication_required: bool,
}

impl PassReport {
    /// Operations that reached a terminal state.
    pub fn terminated(&self) -> usize {
        self.completed + self.conflicted + self.failed
    }

    /// The pass had work but could not move any of it forward.
    pub fn is_stuck(&self) -> bool {
        self.completed + self.conflicted == 0
            && (self.failed + self.requeued > 0 || self.authentication_required)
    }
}

/// A conflict resolution as applied by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConflict {
    pub conflict: Conflict,
    /// State the local replica should now hold (`None` when deferred).
    pub canonical: Option<Value>,
    /// Corrective operation enqueued to bring the remote in line.
    pub operation: Option<Operation>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner<R: Remote + ?Sized> {
    queue: Mutex<OperationQueue>,
    conflicts: Mutex<ConflictStore>,
    resolver: ConflictResolver,
    retry: RetryPolicy<RemoteError>,
    state: SharedSyncState,
    events: EventBus,
    /// Wakes the background runner.
    wake: Notify,
    /// Cancelled when connectivity drops; replaced at the start of each pass.
    pass_cancel: Mutex<CancellationToken>,
    shutdown: CancellationToken,
    remote: Arc<R>,
}

/// Handle to the sync engine. Clones share the same engine.
pub struct SyncEngine<R: Remote + ?Sized = dyn Remote> {
    inner: Arc<Inner<R>>,
}

impl<R: Remote + ?Sized> Clone for SyncEngine<R> {
    fn clone(&self) -> Self {
        SyncEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// How a single attempt ended, once bookkeeping is done.
enum Settled {
    Continue,
    Stop,
}

impl<R: Remote + ?Sized + 'static> SyncEngine<R> {
    /// Create an engine. It starts idle and offline.
    pub fn new(
        remote: Arc<R>,
        queue: OperationQueue,
        conflicts: ConflictStore,
        retry: RetryPolicy<RemoteError>,
    ) -> Self {
        SyncEngine {
            inner: Arc::new(Inner {
                queue: Mutex::new(queue),
                conflicts: Mutex::new(conflicts),
                resolver: ConflictResolver::new(),
                retry,
                state: SharedSyncState::new(),
                events: EventBus::new(),
                wake: Notify::new(),
                pass_cancel: Mutex::new(CancellationToken::new()),
                shutdown: CancellationToken::new(),
                remote,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    // -- Commands ---------------------------------------------------------

    /// Record a local mutation. Synchronous; triggers a pass when online.
    pub fn enqueue(&self, intent: NewOperation) -> SyncResult<Operation> {
        let op = lock(&self.inner.queue).enqueue(intent)?;
        self.emit_queue_changed();
        self.trigger();
        Ok(op)
    }

    /// Connectivity signal.
    ///
    /// Going online wakes the runner. Going offline cancels the running
    /// pass's backoff waits; queued operations are untouched.
    pub fn set_online(&self, online: bool) {
        let was_online = self.inner.state.set_online(online);
        if was_online == online {
            return;
        }

        tracing::info!(online, "connectivity changed");
        if online {
            self.inner.wake.notify_one();
        } else {
            lock(&self.inner.pass_cancel).cancel();
        }
        self.emit_status();
    }

    /// Follow a connectivity source until it closes or the engine shuts down.
    pub fn watch_connectivity(&self, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            let initial = *rx.borrow_and_update();
            engine.set_online(initial);
            loop {
                tokio::select! {
                    biased;
                    _ = engine.inner.shutdown.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let online = *rx.borrow_and_update();
                        engine.set_online(online);
                    }
                }
            }
        })
    }

    /// Run passes in the background whenever triggered while online.
    pub fn spawn_runner(&self) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = engine.inner.shutdown.cancelled() => break,
                    _ = engine.inner.wake.notified() => {}
                }
                if !engine.is_online() {
                    continue;
                }
                match engine.run_pass().await {
                    Ok(_) | Err(SyncError::AlreadySyncing) | Err(SyncError::Offline) => {}
                    Err(e) => tracing::warn!(error = %e, "sync pass failed"),
                }
            }
            tracing::debug!("sync runner stopped");
        })
    }

    /// Stop background tasks and abandon any backoff wait in progress.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        lock(&self.inner.pass_cancel).cancel();
    }

    /// Run a pass now. Rejected if one is already running or if offline.
    pub async fn force_sync(&self) -> SyncResult<PassReport> {
        self.run_pass().await
    }

    /// Put a `failed` operation back in line with a fresh retry budget.
    pub fn retry_operation(&self, id: &str) -> SyncResult<Option<Operation>> {
        let op = lock(&self.inner.queue).retry(id)?;
        if op.is_some() {
            self.emit_queue_changed();
            self.trigger();
        }
        Ok(op)
    }

    pub fn remove_operation(&self, id: &str) -> SyncResult<Option<Operation>> {
        let op = lock(&self.inner.queue).remove(id)?;
        if op.is_some() {
            self.emit_queue_changed();
        }
        Ok(op)
    }

    /// Settle a conflict and enqueue the corrective operation, if any.
    ///
    /// Returns `None` if the conflict is unknown or already resolved.
    pub fn resolve_conflict(
        &self,
        id: &str,
        resolution: Resolution,
        merged: Option<Value>,
    ) -> SyncResult<Option<ResolvedConflict>> {
        let resolved = {
            let mut queue = lock(&self.inner.queue);
            let mut conflicts = lock(&self.inner.conflicts);
            let Some(resolved) =
                self.inner
                    .resolver
                    .resolve(&mut conflicts, id, resolution, merged)?
            else {
                return Ok(None);
            };
            if resolved.canonical.is_some() {
                // The conflict supersedes the operation that raised it; drop
                // it if a crash left it queued.
                queue.remove(&resolved.conflict.operation_id)?;
            }
            let operation = resolved
                .corrective
                .map(|intent| queue.enqueue_corrective(intent))
                .transpose()?;
            ResolvedConflict {
                conflict: resolved.conflict,
                canonical: resolved.canonical,
                operation,
            }
        };

        self.emit_conflicts_changed();
        if resolution != Resolution::Manual {
            self.inner.events.emit(SyncEvent::ConflictResolved {
                conflict_id: resolved.conflict.id.clone(),
                entity_type: resolved.conflict.entity_type.clone(),
                entity_id: resolved.conflict.entity_id.clone(),
                resolution,
                canonical: resolved.canonical.clone(),
            });
        }
        if resolved.operation.is_some() {
            self.emit_queue_changed();
            self.trigger();
        }
        Ok(Some(resolved))
    }

    /// Apply one strategy to every unresolved conflict.
    ///
    /// `merge` needs per-conflict data and is rejected.
    pub fn resolve_all_conflicts(&self, resolution: Resolution) -> SyncResult<Vec<ResolvedConflict>> {
        if resolution == Resolution::Merge {
            return Err(ResolveError::MergeDataRequired.into());
        }

        let ids: Vec<String> = lock(&self.inner.conflicts)
            .unresolved()
            .into_iter()
            .map(|c| c.id)
            .collect();

        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(r) = self.resolve_conflict(&id, resolution, None)? {
                resolved.push(r);
            }
        }
        Ok(resolved)
    }

    /// Drop resolved conflicts from storage.
    pub fn prune_resolved_conflicts(&self) -> SyncResult<usize> {
        Ok(lock(&self.inner.conflicts).prune_resolved()?)
    }

    // -- Projections ------------------------------------------------------

    pub fn list_by_status(&self, status: OperationStatus) -> Vec<Operation> {
        lock(&self.inner.queue).list_by_status(status)
    }

    /// Queued operations in order.
    pub fn operations(&self) -> Vec<Operation> {
        lock(&self.inner.queue).all().to_vec()
    }

    pub fn operation(&self, id: &str) -> Option<Operation> {
        lock(&self.inner.queue).get(id).cloned()
    }

    pub fn unresolved_conflicts(&self) -> Vec<Conflict> {
        lock(&self.inner.conflicts).unresolved()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        lock(&self.inner.conflicts).all().to_vec()
    }

    pub fn conflict(&self, id: &str) -> Option<Conflict> {
        lock(&self.inner.conflicts).get(id).cloned()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.inner.state.status()
    }

    pub fn is_online(&self) -> bool {
        self.inner.state.is_online()
    }

    pub fn sync_progress(&self) -> u8 {
        self.inner.state.progress()
    }

    /// Full queue and conflict state, for diagnostics.
    pub fn export_snapshot(&self) -> StateSnapshot {
        let operations = {
            let queue = lock(&self.inner.queue);
            let mut operations = queue.list_by_status(OperationStatus::Completed);
            operations.extend(queue.all().iter().cloned());
            operations
        };
        StateSnapshot {
            exported_at: Utc::now(),
            sync_status: self.sync_status(),
            is_online: self.is_online(),
            progress: self.sync_progress(),
            operations,
            conflicts: self.conflicts(),
        }
    }

    // -- Sync pass --------------------------------------------------------

    /// Run one pass over the queue.
    pub async fn run_pass(&self) -> SyncResult<PassReport> {
        let inner = &self.inner;
        if !inner.state.try_begin_pass() {
            return Err(SyncError::AlreadySyncing);
        }

        if !inner.state.is_online() {
            inner.state.set_status(SyncStatus::Error);
            self.emit_status();
            return Err(SyncError::Offline);
        }

        let cancel = CancellationToken::new();
        *lock(&inner.pass_cancel) = cancel.clone();
        // Connectivity may have dropped before the token was installed.
        if !inner.state.is_online() {
            cancel.cancel();
        }

        self.emit_status();
        inner.events.emit(SyncEvent::SyncProgress { percent: 0 });

        let result = self.drain(&cancel).await;

        let status = match &result {
            Ok(report) if report.is_stuck() => SyncStatus::Error,
            Ok(_) => SyncStatus::Idle,
            Err(_) => SyncStatus::Error,
        };
        inner.state.set_status(status);
        self.emit_status();

        match &result {
            Ok(report) => tracing::info!(
                total = report.total,
                completed = report.completed,
                conflicted = report.conflicted,
                failed = report.failed,
                requeued = report.requeued,
                interrupted = report.interrupted,
                %status,
                "sync pass finished"
            ),
            Err(e) => tracing::warn!(error = %e, "sync pass aborted"),
        }
        result
    }

    async fn drain(&self, cancel: &CancellationToken) -> SyncResult<PassReport> {
        let total = lock(&self.inner.queue).pending_count();
        let mut report = PassReport {
            total,
            ..PassReport::default()
        };
        let mut attempted: HashSet<String> = HashSet::new();

        loop {
            if cancel.is_cancelled() {
                report.interrupted = true;
                break;
            }

            let next = {
                let queue = lock(&self.inner.queue);
                let conflicts = lock(&self.inner.conflicts);
                queue.next_eligible(|op| {
                    !attempted.contains(&op.id)
                        && !conflicts.is_blocked(&op.entity_type, &op.entity_id)
                })
            };
            let Some(op) = next else {
                break;
            };
            attempted.insert(op.id.clone());

            let marked = lock(&self.inner.queue).mark_syncing(&op.id)?;
            if !marked {
                continue;
            }
            self.emit_queue_changed();
            tracing::debug!(op_id = %op.id, entity = %op.entity_key(), kind = %op.kind, "syncing");

            let remote = &*self.inner.remote;
            let target = &op;
            let outcome = self
                .inner
                .retry
                .execute(move || remote.apply(target), cancel)
                .await;

            let settled = match self.settle(&op, outcome, cancel, &mut report).await {
                Ok(settled) => settled,
                Err(e) => {
                    self.release(&op);
                    return Err(e);
                }
            };
            self.emit_queue_changed();
            self.report_progress(&report);

            if let Settled::Stop = settled {
                break;
            }
        }

        if report.total == 0 {
            self.inner.state.advance_progress(100);
            self.inner.events.emit(SyncEvent::SyncProgress { percent: 100 });
        }
        Ok(report)
    }

    async fn settle(
        &self,
        op: &Operation,
        outcome: Result<RemoteAck, RetryError<RemoteError>>,
        cancel: &CancellationToken,
        report: &mut PassReport,
    ) -> SyncResult<Settled> {
        let error = match outcome {
            Ok(ack) => {
                self.complete(op, ack)?;
                report.completed += 1;
                return Ok(Settled::Continue);
            }
            Err(error) => error,
        };

        if let RetryError::Cancelled { attempts, .. } = &error {
            tracing::info!(op_id = %op.id, attempts, "connectivity lost, operation requeued");
            lock(&self.inner.queue).revert_pending(&op.id)?;
            report.interrupted = true;
            return Ok(Settled::Stop);
        }

        if error.error().is_unauthorized() {
            tracing::warn!(op_id = %op.id, "authentication required, pausing sync");
            lock(&self.inner.queue).revert_pending(&op.id)?;
            report.authentication_required = true;
            self.inner.events.emit(SyncEvent::AuthenticationRequired {
                operation_id: op.id.clone(),
            });
            return Ok(Settled::Stop);
        }

        let attempts = error.attempts();
        let exhausted = matches!(error, RetryError::Exhausted { .. });
        match error.into_inner() {
            RemoteError::Conflict { remote } => {
                let snapshot = match remote {
                    Some(remote) => Ok(Some(remote)),
                    None => self.fetch_remote(op, cancel).await,
                };
                match snapshot {
                    Ok(remote) => {
                        let conflict =
                            Conflict::detect(op, remote.unwrap_or(Value::Null), Utc::now());
                        lock(&self.inner.conflicts).insert(conflict)?;
                        lock(&self.inner.queue).mark_completed(&op.id)?;
                        report.conflicted += 1;
                        self.emit_conflicts_changed();
                        Ok(Settled::Continue)
                    }
                    Err(RetryError::Cancelled { .. }) => {
                        lock(&self.inner.queue).revert_pending(&op.id)?;
                        report.interrupted = true;
                        Ok(Settled::Stop)
                    }
                    Err(e) => {
                        let failure = Failure {
                            retries_used: e.attempts().saturating_sub(1),
                            retryable: matches!(e, RetryError::Exhausted { .. }),
                            message: format!("conflict detected, remote snapshot unavailable: {}", e.error()),
                        };
                        self.fail(op, &failure, report)?;
                        Ok(Settled::Continue)
                    }
                }
            }
            error => {
                let failure = Failure {
                    retries_used: attempts.saturating_sub(1),
                    retryable: exhausted,
                    message: error.to_string(),
                };
                self.fail(op, &failure, report)?;
                Ok(Settled::Continue)
            }
        }
    }

    fn complete(&self, op: &Operation, ack: RemoteAck) -> SyncResult<()> {
        lock(&self.inner.queue).mark_completed(&op.id)?;
        tracing::debug!(op_id = %op.id, entity = %op.entity_key(), "completed");

        if op.kind != OperationKind::Create {
            return Ok(());
        }
        let Some(assigned) = ack.entity_id.filter(|id| *id != op.entity_id) else {
            return Ok(());
        };

        let requeued = lock(&self.inner.queue).reassign_entity_id(
            &op.entity_type,
            &op.entity_id,
            &assigned,
        )?;
        lock(&self.inner.conflicts).reassign_entity_id(
            &op.entity_type,
            &op.entity_id,
            &assigned,
        )?;
        tracing::debug!(
            entity_type = %op.entity_type,
            provisional = %op.entity_id,
            assigned = %assigned,
            requeued,
            "entity reconciled"
        );
        self.inner.events.emit(SyncEvent::EntityReconciled {
            entity_type: op.entity_type.clone(),
            provisional_id: op.entity_id.clone(),
            entity_id: assigned,
        });
        Ok(())
    }

    /// Put an operation back after its bookkeeping failed mid-pass.
    fn release(&self, op: &Operation) {
        if let Err(e) = lock(&self.inner.queue).release(&op.id) {
            tracing::warn!(op_id = %op.id, error = %e, "released operation not persisted");
        }
        self.emit_queue_changed();
    }

    fn fail(&self, op: &Operation, failure: &Failure, report: &mut PassReport) -> SyncResult<()> {
        let updated = lock(&self.inner.queue).mark_failed(&op.id, failure)?;
        match updated.map(|o| o.status) {
            Some(OperationStatus::Failed) => {
                tracing::warn!(op_id = %op.id, error = %failure.message, "operation failed");
                report.failed += 1;
            }
            Some(_) => {
                tracing::debug!(op_id = %op.id, error = %failure.message, "operation requeued");
                report.requeued += 1;
            }
            None => {}
        }
        Ok(())
    }

    async fn fetch_remote(
        &self,
        op: &Operation,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, RetryError<RemoteError>> {
        let remote = &*self.inner.remote;
        let entity_type = &op.entity_type;
        let entity_id = op.entity_id.as_str();
        self.inner
            .retry
            .execute(move || remote.fetch(entity_type, entity_id), cancel)
            .await
    }

    /// Raise the stored progress from the terminated share of the pass.
    fn report_progress(&self, report: &PassReport) {
        let percent = if report.total == 0 {
            100
        } else {
            (report.terminated() * 100 / report.total).min(100)
        };
        let percent = u8::try_from(percent).unwrap_or(100);
        if self.inner.state.advance_progress(percent) {
            self.inner.events.emit(SyncEvent::SyncProgress { percent });
        }
    }

    // -- Events -----------------------------------------------------------

    fn trigger(&self) {
        if self.is_online() {
            self.inner.wake.notify_one();
        }
    }

    fn emit_queue_changed(&self) {
        let event = {
            let queue = lock(&self.inner.queue);
            SyncEvent::QueueChanged {
                pending: queue.count(OperationStatus::Pending),
                syncing: queue.count(OperationStatus::Syncing),
                failed: queue.count(OperationStatus::Failed),
            }
        };
        self.inner.events.emit(event);
    }

    fn emit_conflicts_changed(&self) {
        let unresolved = lock(&self.inner.conflicts).unresolved_count();
        self.inner
            .events
            .emit(SyncEvent::ConflictsChanged { unresolved });
    }

    fn emit_status(&self) {
        self.inner.events.emit(SyncEvent::StatusChanged {
            status: self.sync_status(),
            is_online: self.is_online(),
        });
    }
}
