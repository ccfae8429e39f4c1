// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn enqueue_then_list() {
    let temp = init_temp();
    let id = enqueue(&temp, &["update", "task", "t1", "--data", r#"{"status":"DONE"}"#]);

    let ops = json_output(resync(&temp).args(["list", "-o", "json"]));
    let ops = ops.as_array().unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0]["id"], id.as_str());
    assert_eq!(ops[0]["type"], "update");
    assert_eq!(ops[0]["entityType"], "task");
    assert_eq!(ops[0]["entityId"], "t1");
    assert_eq!(ops[0]["status"], "pending");
    assert_eq!(ops[0]["data"]["status"], "DONE");

    resync(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(&id[..8]))
        .stdout(predicate::str::contains("pending"))
        .stdout(predicate::str::contains("update task/t1"));
}

#[test]
fn create_without_id_gets_provisional_id() {
    let temp = init_temp();

    resync(&temp)
        .args(["enqueue", "create", "project", "--data", r#"{"name":"Docs"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued"))
        .stdout(predicate::str::contains("create project/local-"));
}

#[test]
fn queue_survives_restart() {
    let temp = init_temp();
    enqueue(&temp, &["delete", "task", "t1"]);
    enqueue(&temp, &["update", "note", "n1", "-d", r#"{"body":"x"}"#]);

    let ops = json_output(resync(&temp).args(["list", "-o", "json"]));
    let kinds: Vec<&str> = ops
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["delete", "update"]);
}

#[parameterized(
    update_without_data = { &["update", "task", "t1"], "needs --data" },
    update_without_id = { &["update", "task", "--data", "{}"], "needs an entity id" },
    delete_with_data = { &["delete", "task", "t1", "--data", "{}"], "takes no --data" },
    data_not_object = { &["create", "task", "--data", "[1]"], "JSON object" },
    data_not_json = { &["create", "task", "--data", "{oops"], "invalid --data JSON" },
)]
fn enqueue_rejects(args: &[&str], message: &str) {
    let temp = init_temp();

    resync(&temp)
        .arg("enqueue")
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn list_filters_by_status() {
    let temp = init_temp();
    enqueue(&temp, &["delete", "task", "t1"]);

    let failed = json_output(resync(&temp).args(["list", "--status", "failed", "-o", "json"]));
    assert!(failed.as_array().unwrap().is_empty());

    resync(&temp)
        .args(["list", "--status", "failed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No operations."));
}

#[test]
fn remove_by_prefix() {
    let temp = init_temp();
    let id = enqueue(&temp, &["delete", "task", "t1"]);

    resync(&temp)
        .args(["remove", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    let ops = json_output(resync(&temp).args(["list", "-o", "json"]));
    assert!(ops.as_array().unwrap().is_empty());
}

#[test]
fn retry_pending_operation_fails() {
    let temp = init_temp();
    let id = enqueue(&temp, &["delete", "task", "t1"]);

    resync(&temp)
        .args(["retry", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not failed"));
}

#[parameterized(
    retry = { "retry", "operation not found: nope" },
    remove = { "remove", "operation not found: nope" },
    resolve = { "resolve", "conflict not found: nope" },
)]
fn unknown_ids(command: &str, message: &str) {
    let temp = init_temp();
    let mut cmd = resync(&temp);
    cmd.args([command, "nope"]);
    if command == "resolve" {
        cmd.arg("local");
    }

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn status_counts_queue() {
    let temp = init_temp();
    enqueue(&temp, &["delete", "task", "t1"]);
    enqueue(&temp, &["delete", "task", "t2"]);

    let status = json_output(resync(&temp).args(["status", "-o", "json"]));
    assert_eq!(status["status"], "idle");
    assert_eq!(status["isOnline"], false);
    assert_eq!(status["pending"], 2);
    assert_eq!(status["failed"], 0);
    assert_eq!(status["unresolvedConflicts"], 0);

    resync(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue: 2 pending"));
}

#[test]
fn conflicts_empty() {
    let temp = init_temp();

    let conflicts = json_output(resync(&temp).args(["conflicts", "-o", "json"]));
    assert!(conflicts.as_array().unwrap().is_empty());

    resync(&temp)
        .arg("prune")
        .assert()
        .success();
}

#[test]
fn resolve_all_rejects_merge() {
    let temp = init_temp();

    resync(&temp)
        .args(["resolve-all", "merge"])
        .assert()
        .failure();
}
