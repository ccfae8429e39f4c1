// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{conflicting_engine, TestContext};
use resync_core::{EntityType, NewOperation, OperationStatus, SyncStatus};
use serde_json::json;

#[tokio::test]
async fn test_pass_collects_events() {
    let engine = conflicting_engine();
    engine
        .enqueue(NewOperation::update(EntityType::Task, "t1", json!({"a": 1})))
        .unwrap();

    let (report, events) = run_pass(&engine).await.unwrap();

    assert_eq!(report.conflicted, 1);
    assert!(!engine.is_online());
    assert!(events.contains(&SyncEvent::ConflictsChanged { unresolved: 1 }));
    assert!(events.contains(&SyncEvent::SyncProgress { percent: 100 }));
    assert!(events.contains(&SyncEvent::StatusChanged {
        status: SyncStatus::Idle,
        is_online: true,
    }));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_remote_fails_operation() {
    // The offline engine's remote refuses every call.
    let ctx = TestContext::new();
    let op = ctx.update("t1", json!({}));

    let (report, _) = run_pass(&ctx.engine).await.unwrap();

    assert_eq!(report.total, 1);
    let op = ctx.engine.operation(&op.id).unwrap();
    assert_ne!(op.status, OperationStatus::Completed);
    assert!(op.last_error.unwrap().contains("no remote configured"));
    assert!(outcome(&report).is_err());
}

#[test]
fn test_outcome() {
    assert!(outcome(&PassReport::default()).is_ok());
    assert!(outcome(&PassReport {
        total: 2,
        completed: 1,
        failed: 1,
        ..PassReport::default()
    })
    .is_ok());
    assert!(matches!(
        outcome(&PassReport {
            total: 1,
            authentication_required: true,
            ..PassReport::default()
        }),
        Err(Error::AuthenticationRequired)
    ));
    assert!(matches!(
        outcome(&PassReport {
            total: 1,
            requeued: 1,
            ..PassReport::default()
        }),
        Err(Error::SyncStalled { requeued: 1, .. })
    ));
}
