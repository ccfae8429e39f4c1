// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Applies resolution strategies to stored conflicts.
//!
//! | Strategy | Canonical state | Corrective operation |
//! |----------|-----------------|----------------------|
//! | local    | `localData`     | forced update, delete, or create if gone remotely |
//! | remote   | `remoteData`    | none |
//! | merge    | caller's data   | forced update, or create if gone remotely |
//! | manual   | unchanged       | none; conflict stays unresolved |

use chrono::Utc;
use resync_core::{Conflict, NewOperation, OperationKind, Resolution};
use serde_json::Value;

use super::conflicts::ConflictStore;

/// Error type for conflict resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("merge resolution requires merged data\n  hint: pass the merged record with --data")]
    MergeDataRequired,

    #[error(transparent)]
    Storage(#[from] resync_core::Error),
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The conflict as stored after resolution.
    pub conflict: Conflict,
    /// State the local replica should hold, if it changes. `None` for a
    /// manual deferral.
    pub canonical: Option<Value>,
    /// Operation to enqueue so the remote converges.
    pub corrective: Option<NewOperation>,
}

/// Stateless resolver over a [`ConflictStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        ConflictResolver
    }

    /// Resolve conflict `id` with `resolution`.
    ///
    /// Returns `None` if the conflict is unknown or already resolved.
    pub fn resolve(
        &self,
        store: &mut ConflictStore,
        id: &str,
        resolution: Resolution,
        merged: Option<Value>,
    ) -> Result<Option<Resolved>, ResolveError> {
        let Some(mut conflict) = store.get(id).filter(|c| !c.is_resolved()).cloned() else {
            return Ok(None);
        };

        let (canonical, corrective) = match resolution {
            Resolution::Local => {
                let canonical = conflict.local_data.clone();
                (Some(canonical.clone()), Some(push_local(&conflict, canonical)))
            }
            Resolution::Remote => (Some(conflict.remote_data.clone()), None),
            Resolution::Merge => {
                let merged = merged.ok_or(ResolveError::MergeDataRequired)?;
                (Some(merged.clone()), Some(push_record(&conflict, merged)))
            }
            Resolution::Manual => (None, None),
        };

        let now = Utc::now();
        if resolution == Resolution::Manual {
            conflict.deferred_at = Some(now);
        } else {
            conflict.resolved_at = Some(now);
            conflict.resolution = Some(resolution);
        }
        store.update(conflict.clone())?;

        tracing::info!(
            conflict_id = %conflict.id,
            entity = %conflict.entity_key(),
            %resolution,
            "conflict resolved"
        );

        Ok(Some(Resolved {
            conflict,
            canonical,
            corrective,
        }))
    }
}

/// Forced operation re-asserting the local side.
fn push_local(conflict: &Conflict, local: Value) -> NewOperation {
    if conflict.kind == OperationKind::Delete {
        return NewOperation::delete(conflict.entity_type.clone(), conflict.entity_id.clone())
            .forced();
    }
    push_record(conflict, local)
}

/// Forced write of a full record; recreates the entity if the remote lost it.
fn push_record(conflict: &Conflict, record: Value) -> NewOperation {
    let intent = if conflict.remote_data.is_null() {
        NewOperation::create(conflict.entity_type.clone(), record)
            .with_entity_id(conflict.entity_id.clone())
    } else {
        NewOperation::update(conflict.entity_type.clone(), conflict.entity_id.clone(), record)
    };
    intent.forced()
}
