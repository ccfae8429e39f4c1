// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use resync_core::Resolution;

use crate::display::{format_record, short_id};
use crate::error::{Error, Result};
use crate::sync::{ResolvedConflict, SyncEngine};

use super::{open_local, parse_record, resolve_id};

pub fn run(state_dir: &Path, id: &str, resolution: Resolution, data: Option<String>) -> Result<()> {
    let merged = data.as_deref().map(parse_record).transpose()?;
    let (_workspace, engine) = open_local(state_dir)?;
    run_impl(&engine, id, resolution, merged)?;
    Ok(())
}

pub(crate) fn run_impl(
    engine: &SyncEngine,
    prefix: &str,
    resolution: Resolution,
    merged: Option<serde_json::Value>,
) -> Result<ResolvedConflict> {
    let conflicts = engine.conflicts();
    let id = resolve_id("conflict", prefix, conflicts.iter().map(|c| c.id.as_str()))?;
    let resolved = engine
        .resolve_conflict(&id, resolution, merged)?
        .ok_or_else(|| Error::InvalidInput(format!("conflict {} is already resolved", short_id(&id))))?;
    report(&resolved, resolution);
    Ok(resolved)
}

pub fn run_all(state_dir: &Path, resolution: Resolution) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    run_all_impl(&engine, resolution)?;
    Ok(())
}

pub(crate) fn run_all_impl(
    engine: &SyncEngine,
    resolution: Resolution,
) -> Result<Vec<ResolvedConflict>> {
    let resolved = engine.resolve_all_conflicts(resolution)?;
    for r in &resolved {
        report(r, resolution);
    }
    println!("{} conflict(s) handled", resolved.len());
    Ok(resolved)
}

fn report(resolved: &ResolvedConflict, resolution: Resolution) {
    let conflict = &resolved.conflict;
    let target = format!("{}/{}", conflict.entity_type, conflict.entity_id);
    if resolution == Resolution::Manual {
        println!("Deferred {} {}", short_id(&conflict.id), target);
        return;
    }
    println!("Resolved {} {} with {}", short_id(&conflict.id), target, resolution);
    if let Some(canonical) = &resolved.canonical {
        println!("  state: {}", format_record(canonical));
    }
    if let Some(op) = &resolved.operation {
        println!("  queued {} {}", short_id(&op.id), op.kind);
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
