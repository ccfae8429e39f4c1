// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Detected divergences between local and remote entity state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::entity::{EntityKey, EntityType};
use crate::error::{Error, Result};
use crate::id::new_conflict_id;
use crate::operation::{Operation, OperationKind};
use crate::patch::overlay;

/// Strategy used to settle a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Keep the local snapshot and force it onto the remote.
    Local,
    /// Keep the remote snapshot and overwrite the local replica.
    Remote,
    /// Apply caller-supplied merged data.
    Merge,
    /// Defer to human review; the conflict stays unresolved.
    Manual,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Local => "local",
            Resolution::Remote => "remote",
            Resolution::Merge => "merge",
            Resolution::Manual => "manual",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Resolution::Local),
            "remote" => Ok(Resolution::Remote),
            "merge" => Ok(Resolution::Merge),
            "manual" => Ok(Resolution::Manual),
            _ => Err(Error::InvalidResolution(s.to_string())),
        }
    }
}

/// A detected divergence for one entity.
///
/// Unresolved iff `resolved_at` is absent. Unresolved conflicts block
/// automatic sync of their entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    /// Kind of the operation that surfaced the conflict.
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Operation superseded by this conflict.
    #[serde(default)]
    pub operation_id: String,
    /// Full local snapshot at detection time.
    pub local_data: Value,
    /// Remote snapshot at detection time, `null` if deleted upstream.
    pub remote_data: Value,
    /// Detection time.
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Set by a manual resolution. A deferred conflict is still unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_at: Option<DateTime<Utc>>,
}

impl Conflict {
    /// Builds a conflict from the operation's intended change and the remote
    /// snapshot fetched at detection time.
    ///
    /// The local side is a full snapshot: an update patch is laid over the
    /// remote record, a create carries its own record, a delete is `null`.
    pub fn detect(op: &Operation, remote_data: Value, now: DateTime<Utc>) -> Self {
        let local_data = match op.kind {
            OperationKind::Create => op.data.clone(),
            OperationKind::Update => overlay(&remote_data, &op.data),
            OperationKind::Delete => Value::Null,
        };

        Conflict {
            id: new_conflict_id(),
            entity_type: op.entity_type.clone(),
            entity_id: op.entity_id.clone(),
            kind: op.kind,
            operation_id: op.id.clone(),
            local_data,
            remote_data,
            timestamp: now,
            resolved_at: None,
            resolution: None,
            deferred_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    pub fn is_deferred(&self) -> bool {
        !self.is_resolved() && self.deferred_at.is_some()
    }

    pub fn entity_key(&self) -> EntityKey {
        EntityKey::new(self.entity_type.clone(), self.entity_id.clone())
    }
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
