// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn sync_without_remote_fails() {
    let temp = init_temp();
    enqueue(&temp, &["delete", "task", "t1"]);

    resync(&temp)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote configured"));

    // Nothing was attempted.
    let ops = json_output(resync(&temp).args(["list", "-o", "json"]));
    assert_eq!(ops[0]["status"], "pending");
    assert!(ops[0].get("lastError").is_none());
}

#[test]
fn sync_empty_queue_succeeds() {
    let temp = init_with_remote("http://127.0.0.1:9");

    resync(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced 0 of 0"));
}

#[test]
fn unreachable_remote_fails_operation() {
    let temp = init_with_remote("http://127.0.0.1:9");
    let id = enqueue(&temp, &["update", "task", "t1", "-d", r#"{"status":"DONE"}"#]);

    resync(&temp)
        .args(["sync", "--events"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""event":"sync_progress""#))
        .stdout(predicate::str::contains("1 failed"))
        .stderr(predicate::str::contains("made no progress"));

    let failed = json_output(resync(&temp).args(["list", "--status", "failed", "-o", "json"]));
    let failed = failed.as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["id"], id.as_str());
    assert!(failed[0]["lastError"].as_str().is_some());

    // A retry puts it back in the queue with a fresh budget.
    resync(&temp).args(["retry", &id]).assert().success();
    let status = json_output(resync(&temp).args(["status", "-o", "json"]));
    assert_eq!(status["pending"], 1);
    assert_eq!(status["failed"], 0);
}

#[test]
fn sync_json_report() {
    let temp = init_with_remote("http://127.0.0.1:9");

    let report = json_output(resync(&temp).args(["sync", "-o", "json"]));
    assert_eq!(report["total"], 0);
    assert_eq!(report["authenticationRequired"], false);
}
