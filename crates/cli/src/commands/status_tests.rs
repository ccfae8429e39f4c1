// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{conflicting_engine, with_conflicts, TestContext};
use serde_json::json;

#[test]
fn test_summary_of_fresh_state() {
    let ctx = TestContext::new();
    assert_eq!(
        summarize(&ctx.engine),
        StatusJson {
            status: SyncStatus::Idle,
            is_online: false,
            progress: 0,
            pending: 0,
            syncing: 0,
            failed: 0,
            unresolved_conflicts: 0,
        }
    );
}

#[test]
fn test_summary_counts_queue_and_conflicts() {
    let ctx = TestContext::new();
    ctx.update("t1", json!({}));
    ctx.update("t2", json!({}));
    assert_eq!(summarize(&ctx.engine).pending, 2);

    let engine = conflicting_engine();
    with_conflicts(&engine, &["t1", "t2", "t3"]);
    let summary = summarize(&engine);
    assert_eq!(summary.unresolved_conflicts, 3);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.progress, 100);
}

#[test]
fn test_summary_json_shape() {
    let ctx = TestContext::new();
    let value = serde_json::to_value(summarize(&ctx.engine)).unwrap();
    assert_eq!(value["status"], "idle");
    assert_eq!(value["isOnline"], false);
    assert_eq!(value["unresolvedConflicts"], 0);
}

#[test]
fn test_run_impl_both_formats() {
    let ctx = TestContext::new();
    run_impl(&ctx.engine, OutputFormat::Text).unwrap();
    run_impl(&ctx.engine, OutputFormat::Json).unwrap();
}
