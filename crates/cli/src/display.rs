// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use resync_core::patch::changed_fields;
use resync_core::{Conflict, Operation, OperationStatus, StateSnapshot};
use serde_json::Value;

use crate::colors;
use crate::sync::PassReport;

/// Characters of an id shown in listings.
const SHORT_ID_LEN: usize = 8;

/// Widest status label (`completed`).
const STATUS_WIDTH: usize = 9;

/// Longest JSON excerpt printed for a record before it is cut.
const MAX_RECORD_CHARS: usize = 120;

/// Leading characters of an id, enough to address it by prefix.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Compact single-line JSON, cut at [`MAX_RECORD_CHARS`].
pub fn format_record(value: &Value) -> String {
    let json = value.to_string();
    if json.chars().count() <= MAX_RECORD_CHARS {
        return json;
    }
    let cut: String = json.chars().take(MAX_RECORD_CHARS).collect();
    format!("{cut}...")
}

/// One operation as shown by `list`.
///
/// ```text
/// 3f2a9c1e  failed     update task/t1  retries: 3
///     error: remote returned 503: unavailable
/// ```
pub fn format_operation(op: &Operation) -> Vec<String> {
    // Pad before coloring so escape codes do not skew the columns.
    let pad = " ".repeat(STATUS_WIDTH.saturating_sub(op.status.as_str().len()));
    let mut line = format!(
        "{}  {}{}  {:<6} {}/{}",
        colors::context(short_id(&op.id)),
        colors::operation_status(op.status),
        pad,
        op.kind.as_str(),
        op.entity_type,
        op.entity_id,
    );
    if op.retry_count > 0 {
        line.push_str(&format!("  retries: {}", op.retry_count));
    }
    if op.force {
        line.push_str("  (forced)");
    }

    let mut lines = vec![line];
    if let Some(error) = &op.last_error {
        lines.push(format!("    error: {error}"));
    }
    lines
}

/// One conflict as shown by `conflicts`.
pub fn format_conflict(conflict: &Conflict) -> Vec<String> {
    let state = match (&conflict.resolution, &conflict.resolved_at) {
        (Some(resolution), Some(at)) => format!("resolved {} at {}", resolution, format_time(at)),
        _ if conflict.is_deferred() => "deferred".to_string(),
        _ => "unresolved".to_string(),
    };
    let mut lines = vec![
        format!(
            "{}  {}/{}  {} by {}  {}  {}",
            colors::context(short_id(&conflict.id)),
            conflict.entity_type,
            conflict.entity_id,
            conflict.kind.as_str(),
            short_id(&conflict.operation_id),
            format_time(&conflict.timestamp),
            state,
        ),
        format!("    local:  {}", format_record(&conflict.local_data)),
        format!("    remote: {}", format_record(&conflict.remote_data)),
    ];
    let fields = changed_fields(&conflict.local_data, &conflict.remote_data);
    if !fields.is_empty() {
        lines.push(format!("    differs: {}", fields.join(", ")));
    }
    lines
}

/// Summary of a sync pass.
pub fn format_report(report: &PassReport) -> String {
    let mut line = format!(
        "synced {} of {}: {} completed, {} conflicted, {} failed, {} requeued",
        report.terminated(),
        report.total,
        report.completed,
        report.conflicted,
        report.failed,
        report.requeued,
    );
    if report.interrupted {
        line.push_str(" (interrupted)");
    }
    if report.authentication_required {
        line.push_str(" (authentication required)");
    }
    line
}

/// The `status` view.
pub fn format_status(snapshot: &StateSnapshot) -> Vec<String> {
    let connectivity = if snapshot.is_online { "online" } else { "offline" };
    vec![
        format!(
            "{} {} ({}, {}%)",
            colors::header("Sync:"),
            colors::sync_status(snapshot.sync_status),
            connectivity,
            snapshot.progress,
        ),
        format!(
            "{} {} pending, {} syncing, {} failed",
            colors::header("Queue:"),
            snapshot.count(OperationStatus::Pending),
            snapshot.count(OperationStatus::Syncing),
            snapshot.count(OperationStatus::Failed),
        ),
        format!(
            "{} {} unresolved",
            colors::header("Conflicts:"),
            snapshot.unresolved_conflicts(),
        ),
    ]
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
