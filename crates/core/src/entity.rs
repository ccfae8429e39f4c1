// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entity categories and identities.
//!
//! The set of entity types is open-ended: the well-known categories have
//! their own variants and anything else round-trips through [`EntityType::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Domain category of a synchronized entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Task,
    Project,
    Workspace,
    /// Timer session.
    Session,
    /// Any category this build does not know by name.
    Other(String),
}

impl EntityType {
    /// Returns the string representation used in storage and on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Task => "task",
            EntityType::Project => "project",
            EntityType::Workspace => "workspace",
            EntityType::Session => "session",
            EntityType::Other(name) => name,
        }
    }

    /// Returns the REST collection name (`task` → `tasks`).
    pub fn collection(&self) -> String {
        let name = self.as_str();
        if name.ends_with('s') {
            name.to_string()
        } else {
            format!("{name}s")
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "task" => EntityType::Task,
            "project" => EntityType::Project,
            "workspace" => EntityType::Workspace,
            "session" => EntityType::Session,
            _ => EntityType::Other(s),
        }
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::InvalidInput("entity type cannot be empty".to_string()));
        }
        Ok(EntityType::from(name))
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for EntityType {
    fn schema_name() -> String {
        "EntityType".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// Identity of one entity: its category plus its id.
///
/// Ordering and conflict blocking are both keyed on this pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub entity_type: EntityType,
    pub entity_id: String,
}

impl EntityKey {
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        EntityKey {
            entity_type,
            entity_id: entity_id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.entity_id)
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
