// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use resync_core::{
    Collection, Conflict, EntityKey, EntityType, MemoryCollection, NewOperation, Operation,
    OperationKind, OperationStatus, Record,
};
use serde_json::{json, Value};

use super::conflicts::ConflictStore;
use super::queue::OperationQueue;
use super::remote::{Remote, RemoteAck, RemoteError, RemoteFuture, RemoteResult};

/// Update intent for task `id`.
pub fn task_update(id: &str, patch: Value) -> NewOperation {
    NewOperation::update(EntityType::Task, id, patch)
}

/// Build an operation and force its status.
pub fn with_status(intent: NewOperation, status: OperationStatus) -> Operation {
    let mut op = Operation::new(intent, Utc::now()).unwrap();
    op.status = status;
    op
}

/// Unresolved conflict on task `entity_id`.
pub fn sample_conflict(entity_id: &str) -> Conflict {
    let op = Operation::new(task_update(entity_id, json!({"status": "DONE"})), Utc::now()).unwrap();
    Conflict::detect(&op, json!({"status": "TODO"}), Utc::now())
}

/// Queue over a shared in-memory collection.
pub fn memory_queue(max_retries: u32) -> (OperationQueue, MemoryCollection<Operation>) {
    let store = MemoryCollection::new();
    let queue = OperationQueue::open(Box::new(store.clone()), max_retries).unwrap();
    (queue, store)
}

/// Conflict store over a shared in-memory collection.
pub fn memory_conflicts() -> (ConflictStore, MemoryCollection<Conflict>) {
    let store = MemoryCollection::new();
    let conflicts = ConflictStore::open(Box::new(store.clone())).unwrap();
    (conflicts, store)
}

/// Collection that fails one chosen save, then recovers.
#[derive(Clone)]
pub struct FlakyCollection<T> {
    inner: MemoryCollection<T>,
    /// Successful saves left before the failing one; `None` when disarmed.
    fail_after: Arc<Mutex<Option<usize>>>,
}

impl<T> FlakyCollection<T> {
    pub fn new() -> Self {
        FlakyCollection {
            inner: MemoryCollection::new(),
            fail_after: Arc::new(Mutex::new(None)),
        }
    }

    /// Let `saves` more saves through, then fail the next one.
    pub fn fail_after(&self, saves: usize) {
        *self.fail_after.lock().unwrap() = Some(saves);
    }

    pub fn stored(&self) -> MemoryCollection<T> {
        self.inner.clone()
    }
}

impl<T: Record> Collection<T> for FlakyCollection<T> {
    fn load(&self) -> resync_core::Result<Vec<T>> {
        self.inner.load()
    }

    fn save(&mut self, records: &[T]) -> resync_core::Result<()> {
        let mut armed = self.fail_after.lock().unwrap();
        match *armed {
            Some(0) => {
                *armed = None;
                Err(resync_core::Error::CorruptedData("disk full".to_string()))
            }
            Some(n) => {
                *armed = Some(n - 1);
                self.inner.save(records)
            }
            None => self.inner.save(records),
        }
    }
}

type ApplyHook = Box<dyn Fn(&Operation) + Send + Sync>;

#[derive(Default)]
struct MockState {
    /// Scripted responses per entity, consumed in order.
    scripts: HashMap<EntityKey, VecDeque<RemoteResult<RemoteAck>>>,
    /// Response used once an entity's script runs out.
    sticky: HashMap<EntityKey, RemoteResult<RemoteAck>>,
    /// Records served by `fetch`.
    records: HashMap<EntityKey, Value>,
    /// Errors returned by `fetch` instead of a record.
    fetch_errors: HashMap<EntityKey, RemoteError>,
    /// Every applied operation, in call order.
    calls: Vec<Operation>,
    fetches: Vec<EntityKey>,
}

/// Scripted [`Remote`] for engine tests.
///
/// Unscripted operations succeed. Created entities are assigned `srv-<n>`
/// ids unless a script says otherwise.
#[derive(Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
    on_apply: Arc<Mutex<Option<ApplyHook>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call on `entity_type/entity_id`.
    pub fn script(&self, entity_type: EntityType, entity_id: &str, response: RemoteResult<RemoteAck>) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(EntityKey::new(entity_type, entity_id))
            .or_default()
            .push_back(response);
    }

    /// Answer every call on the entity with `response` once its script is spent.
    pub fn always(&self, entity_type: EntityType, entity_id: &str, response: RemoteResult<RemoteAck>) {
        self.state
            .lock()
            .unwrap()
            .sticky
            .insert(EntityKey::new(entity_type, entity_id), response);
    }

    /// Make every `fetch` of `entity_type/entity_id` fail with `error`.
    pub fn fail_fetch(&self, entity_type: EntityType, entity_id: &str, error: RemoteError) {
        self.state
            .lock()
            .unwrap()
            .fetch_errors
            .insert(EntityKey::new(entity_type, entity_id), error);
    }

    /// Record served by `fetch`.
    pub fn set_record(&self, entity_type: EntityType, entity_id: &str, record: Value) {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(EntityKey::new(entity_type, entity_id), record);
    }

    /// Run `hook` at the start of every `apply`.
    pub fn on_apply(&self, hook: impl Fn(&Operation) + Send + Sync + 'static) {
        *self.on_apply.lock().unwrap() = Some(Box::new(hook));
    }

    /// Operations applied so far, in call order.
    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Ids of applied operations, in call order.
    pub fn call_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|op| op.id).collect()
    }

    pub fn fetches(&self) -> Vec<EntityKey> {
        self.state.lock().unwrap().fetches.clone()
    }

    fn respond(&self, op: &Operation) -> RemoteResult<RemoteAck> {
        if let Some(hook) = self.on_apply.lock().unwrap().as_ref() {
            hook(op);
        }

        let mut state = self.state.lock().unwrap();
        state.calls.push(op.clone());
        let key = op.entity_key();

        if let Some(response) = state.scripts.get_mut(&key).and_then(VecDeque::pop_front) {
            return response;
        }
        if let Some(response) = state.sticky.get(&key) {
            return response.clone();
        }

        match op.kind {
            OperationKind::Create => {
                let assigned = format!("srv-{}", state.calls.len());
                Ok(RemoteAck::with_entity_id(assigned))
            }
            OperationKind::Update | OperationKind::Delete => Ok(RemoteAck::default()),
        }
    }
}

impl Remote for MockRemote {
    fn apply<'a>(&'a self, op: &'a Operation) -> RemoteFuture<'a, RemoteAck> {
        Box::pin(async move { self.respond(op) })
    }

    fn fetch<'a>(
        &'a self,
        entity_type: &'a EntityType,
        entity_id: &'a str,
    ) -> RemoteFuture<'a, Option<Value>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let key = EntityKey::new(entity_type.clone(), entity_id);
            state.fetches.push(key.clone());
            if let Some(error) = state.fetch_errors.get(&key) {
                return Err(error.clone());
            }
            Ok(state.records.get(&key).cloned())
        })
    }
}

/// Shorthand for a status error.
pub fn status(code: u16) -> RemoteResult<RemoteAck> {
    Err(RemoteError::Status {
        code,
        message: format!("status {code}"),
    })
}

/// Shorthand for a network error.
pub fn network() -> RemoteResult<RemoteAck> {
    Err(RemoteError::Network("connection refused".into()))
}

/// Shorthand for a version conflict.
pub fn conflict(remote: Option<Value>) -> RemoteResult<RemoteAck> {
    Err(RemoteError::Conflict { remote })
}
