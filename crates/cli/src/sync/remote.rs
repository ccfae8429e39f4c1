// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote abstraction for replaying operations.
//!
//! Provides a trait-based boundary that enables:
//! - The REST client used in production ([`super::HttpRemote`])
//! - Scripted remotes for unit testing

use std::future::Future;
use std::pin::Pin;

use resync_core::{EntityType, Operation};
use serde_json::Value;

use super::retry::{Classify, FailureClass, UNAUTHORIZED};

/// Error type for remote calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// No response (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status other than a version conflict.
    #[error("remote returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The remote entity changed since the operation was recorded.
    ///
    /// Carries the remote snapshot when the response included one.
    #[error("version conflict")]
    Conflict { remote: Option<Value> },

    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Status { code, .. } if *code == UNAUTHORIZED)
    }
}

impl Classify for RemoteError {
    fn classify(&self) -> FailureClass {
        match self {
            RemoteError::Network(_) => FailureClass::Network,
            RemoteError::Status { code, .. } => FailureClass::Status(*code),
            RemoteError::Conflict { .. } | RemoteError::Decode(_) => FailureClass::Fatal,
        }
    }
}

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`Remote`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Successful application of an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteAck {
    /// Server-assigned id, for creates.
    pub entity_id: Option<String>,
    /// Record as stored by the remote, when returned.
    pub data: Option<Value>,
}

impl RemoteAck {
    pub fn with_entity_id(entity_id: impl Into<String>) -> Self {
        RemoteAck {
            entity_id: Some(entity_id.into()),
            data: None,
        }
    }
}

/// The remote source of truth.
///
/// Implementations must treat the operation id as an idempotency key: a
/// replayed operation must not be applied twice.
pub trait Remote: Send + Sync {
    /// Apply one operation.
    fn apply<'a>(&'a self, op: &'a Operation) -> RemoteFuture<'a, RemoteAck>;

    /// Fetch the current remote snapshot of an entity.
    ///
    /// Returns `None` if the entity does not exist remotely.
    fn fetch<'a>(
        &'a self,
        entity_type: &'a EntityType,
        entity_id: &'a str,
    ) -> RemoteFuture<'a, Option<Value>>;
}

/// Remote used when no endpoint is configured.
///
/// Every call fails as a network error, so operations stay queued.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl Remote for Unconfigured {
    fn apply<'a>(&'a self, _op: &'a Operation) -> RemoteFuture<'a, RemoteAck> {
        Box::pin(async { Err(RemoteError::Network("no remote configured".into())) })
    }

    fn fetch<'a>(
        &'a self,
        _entity_type: &'a EntityType,
        _entity_id: &'a str,
    ) -> RemoteFuture<'a, Option<Value>> {
        Box::pin(async { Err(RemoteError::Network("no remote configured".into())) })
    }
}
