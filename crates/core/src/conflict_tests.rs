// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::operation::NewOperation;
use serde_json::json;
use yare::parameterized;

fn op(intent: NewOperation) -> Operation {
    Operation::new(intent, Utc::now()).unwrap()
}

#[parameterized(
    local = { "local", Resolution::Local },
    remote = { "remote", Resolution::Remote },
    merge = { "Merge", Resolution::Merge },
    manual = { "manual", Resolution::Manual },
)]
fn resolution_from_str(input: &str, expected: Resolution) {
    assert_eq!(input.parse::<Resolution>().unwrap(), expected);
}

#[test]
fn resolution_rejects_unknown() {
    assert!(matches!(
        "theirs".parse::<Resolution>(),
        Err(Error::InvalidResolution(_))
    ));
}

#[test]
fn detect_update_overlays_patch_on_remote() {
    let op = op(NewOperation::update(EntityType::Task, "t1", json!({"status": "DONE"})));
    let remote = json!({"title": "Renamed elsewhere", "status": "TODO"});

    let conflict = Conflict::detect(&op, remote.clone(), Utc::now());

    assert_eq!(conflict.entity_id, "t1");
    assert_eq!(conflict.kind, OperationKind::Update);
    assert_eq!(conflict.operation_id, op.id);
    assert_eq!(conflict.local_data["status"], "DONE");
    assert_eq!(conflict.local_data["title"], "Renamed elsewhere");
    assert_eq!(conflict.remote_data, remote);
    assert!(!conflict.is_resolved());
    assert!(!conflict.is_deferred());
}

#[test]
fn detect_create_keeps_record() {
    let op = op(NewOperation::create(EntityType::Project, json!({"name": "Home"})).with_entity_id("p1"));
    let conflict = Conflict::detect(&op, json!({"name": "Work"}), Utc::now());
    assert_eq!(conflict.local_data, json!({"name": "Home"}));
}

#[test]
fn detect_delete_has_null_local() {
    let op = op(NewOperation::delete(EntityType::Session, "s1"));
    let conflict = Conflict::detect(&op, json!({"minutes": 25}), Utc::now());
    assert_eq!(conflict.local_data, Value::Null);
}

#[test]
fn deferred_only_while_unresolved() {
    let op = op(NewOperation::update(EntityType::Task, "t1", json!({})));
    let mut conflict = Conflict::detect(&op, json!({}), Utc::now());

    conflict.deferred_at = Some(Utc::now());
    assert!(conflict.is_deferred());

    conflict.resolved_at = Some(Utc::now());
    conflict.resolution = Some(Resolution::Remote);
    assert!(conflict.is_resolved());
    assert!(!conflict.is_deferred());
}

#[test]
fn conflict_json_uses_camel_case() {
    let op = op(NewOperation::update(EntityType::Task, "t1", json!({"status": "DONE"})));
    let conflict = Conflict::detect(&op, json!({"status": "TODO"}), Utc::now());
    let value = serde_json::to_value(&conflict).unwrap();

    assert_eq!(value["type"], "update");
    assert_eq!(value["localData"]["status"], "DONE");
    assert_eq!(value["remoteData"]["status"], "TODO");
    assert!(value.get("resolvedAt").is_none());

    let parsed: Conflict = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, conflict);
}
