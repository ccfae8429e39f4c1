// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    task = { "task", EntityType::Task },
    project = { "project", EntityType::Project },
    workspace = { "workspace", EntityType::Workspace },
    session = { "session", EntityType::Session },
    uppercase = { "TASK", EntityType::Task },
    custom = { "label", EntityType::Other("label".into()) },
)]
fn entity_type_from_str(input: &str, expected: EntityType) {
    assert_eq!(input.parse::<EntityType>().unwrap(), expected);
}

#[test]
fn entity_type_rejects_empty() {
    assert!("  ".parse::<EntityType>().is_err());
}

#[parameterized(
    task = { EntityType::Task, "tasks" },
    session = { EntityType::Session, "sessions" },
    custom = { EntityType::Other("label".into()), "labels" },
    already_plural = { EntityType::Other("settings".into()), "settings" },
)]
fn entity_type_collection(entity_type: EntityType, expected: &str) {
    assert_eq!(entity_type.collection(), expected);
}

#[test]
fn entity_type_serializes_as_plain_string() {
    assert_eq!(serde_json::to_string(&EntityType::Task).unwrap(), "\"task\"");
    assert_eq!(
        serde_json::to_string(&EntityType::Other("label".into())).unwrap(),
        "\"label\""
    );

    let parsed: EntityType = serde_json::from_str("\"workspace\"").unwrap();
    assert_eq!(parsed, EntityType::Workspace);
    let parsed: EntityType = serde_json::from_str("\"tag\"").unwrap();
    assert_eq!(parsed, EntityType::Other("tag".into()));
}

#[test]
fn entity_key_display() {
    let key = EntityKey::new(EntityType::Project, "p1");
    assert_eq!(key.to_string(), "project/p1");
}
