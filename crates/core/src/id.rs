// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation for operations, conflicts and provisional entities.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entity::EntityType;

/// Prefix marking an entity id that was generated locally and not yet
/// confirmed by the remote service.
pub const PROVISIONAL_PREFIX: &str = "local-";

/// Generate a new operation id. Also used as the remote idempotency key.
pub fn new_operation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a new conflict id.
pub fn new_conflict_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a provisional id for an entity created offline.
/// Format: `local-{hash}` where hash is the first 8 hex chars of
/// SHA256(entity type + payload + timestamp).
pub fn provisional_entity_id(
    entity_type: &EntityType,
    data: &Value,
    created_at: &DateTime<Utc>,
) -> String {
    let input = format!("{}{}{}", entity_type, data, created_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    format!("{}{}", PROVISIONAL_PREFIX, hex::encode(&hash[..4]))
}

/// Returns true if the id was produced by [`provisional_entity_id`].
pub fn is_provisional(entity_id: &str) -> bool {
    entity_id.starts_with(PROVISIONAL_PREFIX)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
