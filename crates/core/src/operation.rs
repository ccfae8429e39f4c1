// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued local mutations awaiting remote replay.
//!
//! An [`Operation`] is created when the user mutates an entity and lives in
//! the operation queue until the sync scheduler terminates it. Its `id` is
//! stable for the operation's lifetime and doubles as the idempotency key
//! sent to the remote service, so a replay after a crash is harmless.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::entity::{EntityKey, EntityType};
use crate::error::{Error, Result};
use crate::id::{new_operation_id, provisional_entity_id};

/// Kind of mutation an operation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OperationKind::Create),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            _ => Err(Error::InvalidOperationKind(s.to_string())),
        }
    }
}

/// Replay state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// Waiting for the next sync pass.
    Pending,
    /// Dispatched to the remote service.
    Syncing,
    /// Applied (or superseded by a conflict). Removed from the queue.
    Completed,
    /// Frozen after exhausting retries or a non-retryable failure.
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "pending",
            OperationStatus::Syncing => "syncing",
            OperationStatus::Completed => "completed",
            OperationStatus::Failed => "failed",
        }
    }

    /// Terminal operations no longer hold back later operations on the same entity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OperationStatus::Pending),
            "syncing" => Ok(OperationStatus::Syncing),
            "completed" => Ok(OperationStatus::Completed),
            "failed" => Ok(OperationStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A single queued local mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique id, also the remote idempotency key.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub entity_type: EntityType,
    /// Affected entity. Provisional (`local-…`) for offline creates until
    /// the server assigns the real id.
    pub entity_id: String,
    /// Full record for create, partial patch for update, `null` for delete.
    #[serde(default)]
    pub data: Value,
    /// Creation time, used for ordering.
    pub timestamp: DateTime<Utc>,
    pub status: OperationStatus,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_retry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Overwrite the remote entity regardless of its version.
    #[serde(default, skip_serializing_if = "is_false")]
    pub force: bool,
}

impl Operation {
    /// Builds a pending operation from a user intent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when an update or delete names no entity.
    pub fn new(intent: NewOperation, now: DateTime<Utc>) -> Result<Self> {
        let entity_id = match (intent.kind, intent.entity_id) {
            (_, Some(id)) if !id.trim().is_empty() => id,
            (OperationKind::Create, _) => {
                provisional_entity_id(&intent.entity_type, &intent.data, &now)
            }
            (kind, _) => {
                return Err(Error::InvalidInput(format!(
                    "{kind} operation requires an entity id"
                )))
            }
        };

        let data = match intent.kind {
            OperationKind::Delete => Value::Null,
            _ => intent.data,
        };

        Ok(Operation {
            id: new_operation_id(),
            kind: intent.kind,
            entity_type: intent.entity_type,
            entity_id,
            data,
            timestamp: now,
            status: OperationStatus::Pending,
            retry_count: 0,
            last_retry: None,
            last_error: None,
            force: intent.force,
        })
    }

    /// Returns the identity of the affected entity.
    pub fn entity_key(&self) -> EntityKey {
        EntityKey::new(self.entity_type.clone(), self.entity_id.clone())
    }

    /// Returns true if this operation targets the given entity.
    pub fn targets(&self, entity_type: &EntityType, entity_id: &str) -> bool {
        self.entity_type == *entity_type && self.entity_id == entity_id
    }
}

/// A user intent to mutate an entity, before it is queued.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub kind: OperationKind,
    pub entity_type: EntityType,
    /// Required for update and delete. A create without one gets a
    /// provisional id.
    pub entity_id: Option<String>,
    pub data: Value,
    pub force: bool,
}

impl NewOperation {
    pub fn create(entity_type: EntityType, data: Value) -> Self {
        NewOperation {
            kind: OperationKind::Create,
            entity_type,
            entity_id: None,
            data,
            force: false,
        }
    }

    pub fn update(entity_type: EntityType, entity_id: impl Into<String>, patch: Value) -> Self {
        NewOperation {
            kind: OperationKind::Update,
            entity_type,
            entity_id: Some(entity_id.into()),
            data: patch,
            force: false,
        }
    }

    pub fn delete(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        NewOperation {
            kind: OperationKind::Delete,
            entity_type,
            entity_id: Some(entity_id.into()),
            data: Value::Null,
            force: false,
        }
    }

    /// Uses the given entity id instead of a provisional one.
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Marks the operation as a forced overwrite of the remote entity.
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
