// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use chrono::TimeZone;
use resync_core::{EntityType, NewOperation, Resolution, SyncStatus};
use serde_json::json;
use yare::parameterized;

fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn plain(lines: Vec<String>) -> Vec<String> {
    lines.iter().map(|l| strip_ansi(l)).collect()
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap()
}

fn operation(status: OperationStatus) -> Operation {
    let mut op = Operation::new(
        NewOperation::update(EntityType::Task, "t1", json!({"status": "DONE"})),
        fixed_time(),
    )
    .unwrap();
    op.id = "3f2a9c1e-0000-4000-8000-000000000000".to_string();
    op.status = status;
    op
}

#[parameterized(
    uuid = { "3f2a9c1e-0000-4000-8000-000000000000", "3f2a9c1e" },
    exact = { "abcdefgh", "abcdefgh" },
    short = { "abc", "abc" },
    empty = { "", "" },
)]
fn test_short_id(id: &str, expected: &str) {
    assert_eq!(short_id(id), expected);
}

#[test]
fn test_format_record_cuts_long_values() {
    let long = json!({"text": "x".repeat(500)});
    let out = format_record(&long);
    assert!(out.ends_with("..."));
    assert_eq!(out.chars().count(), MAX_RECORD_CHARS + 3);

    assert_eq!(format_record(&json!({"a": 1})), r#"{"a":1}"#);
}

#[test]
fn test_format_pending_operation() {
    let lines = plain(format_operation(&operation(OperationStatus::Pending)));
    assert_eq!(lines, vec!["3f2a9c1e  pending    update task/t1"]);
}

#[test]
fn test_format_failed_operation_shows_retries_and_error() {
    let mut op = operation(OperationStatus::Failed);
    op.retry_count = 3;
    op.last_error = Some("remote returned 503: unavailable".to_string());

    let lines = plain(format_operation(&op));

    assert_eq!(
        lines,
        vec![
            "3f2a9c1e  failed     update task/t1  retries: 3",
            "    error: remote returned 503: unavailable",
        ]
    );
}

#[test]
fn test_format_forced_operation() {
    let mut op = operation(OperationStatus::Pending);
    op.force = true;
    assert!(plain(format_operation(&op))[0].ends_with("(forced)"));
}

#[test]
fn test_format_conflict_states() {
    let op = operation(OperationStatus::Syncing);
    let mut conflict = Conflict::detect(&op, json!({"status": "TODO"}), fixed_time());
    conflict.id = "c0ffee00-1111".to_string();

    let lines = plain(format_conflict(&conflict));
    assert_eq!(
        lines[0],
        "c0ffee00  task/t1  update by 3f2a9c1e  2026-03-14 09:26  unresolved"
    );
    assert_eq!(lines[1], r#"    local:  {"status":"DONE"}"#);
    assert_eq!(lines[2], r#"    remote: {"status":"TODO"}"#);
    assert_eq!(lines[3], "    differs: status");

    conflict.deferred_at = Some(fixed_time());
    assert!(plain(format_conflict(&conflict))[0].ends_with("deferred"));

    conflict.resolution = Some(Resolution::Local);
    conflict.resolved_at = Some(fixed_time());
    assert!(plain(format_conflict(&conflict))[0].ends_with("resolved local at 2026-03-14 09:26"));
}

#[test]
fn test_format_report() {
    let report = PassReport {
        total: 4,
        completed: 2,
        conflicted: 1,
        failed: 1,
        requeued: 0,
        interrupted: false,
        authentication_required: false,
    };
    assert_eq!(
        format_report(&report),
        "synced 4 of 4: 2 completed, 1 conflicted, 1 failed, 0 requeued"
    );

    let paused = PassReport {
        total: 1,
        authentication_required: true,
        ..PassReport::default()
    };
    assert!(format_report(&paused).ends_with("(authentication required)"));
}

#[test]
fn test_format_status() {
    let snapshot = StateSnapshot {
        exported_at: fixed_time(),
        sync_status: SyncStatus::Idle,
        is_online: false,
        progress: 100,
        operations: vec![
            operation(OperationStatus::Pending),
            operation(OperationStatus::Failed),
        ],
        conflicts: vec![],
    };

    let lines = plain(format_status(&snapshot));

    assert_eq!(
        lines,
        vec![
            "Sync: idle (offline, 100%)",
            "Queue: 1 pending, 0 syncing, 1 failed",
            "Conflicts: 0 unresolved",
        ]
    );
}
