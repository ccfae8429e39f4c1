// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `retry` and `remove`: manual queue maintenance.

use std::path::Path;

use crate::display::short_id;
use crate::error::{Error, Result};
use crate::sync::SyncEngine;

use super::{open_local, resolve_id};

fn operation_id(engine: &SyncEngine, prefix: &str) -> Result<String> {
    let ops = engine.operations();
    resolve_id("operation", prefix, ops.iter().map(|op| op.id.as_str()))
}

pub fn retry(state_dir: &Path, id: &str) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    retry_impl(&engine, id)
}

pub(crate) fn retry_impl(engine: &SyncEngine, prefix: &str) -> Result<()> {
    let id = operation_id(engine, prefix)?;
    let op = engine.retry_operation(&id)?.ok_or_else(|| {
        Error::InvalidInput(format!("operation {} has not failed", short_id(&id)))
    })?;
    println!("Requeued {} {}/{}", short_id(&op.id), op.entity_type, op.entity_id);
    Ok(())
}

pub fn remove(state_dir: &Path, id: &str) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    remove_impl(&engine, id)
}

pub(crate) fn remove_impl(engine: &SyncEngine, prefix: &str) -> Result<()> {
    let id = operation_id(engine, prefix)?;
    let op = engine.remove_operation(&id)?.ok_or_else(|| {
        Error::InvalidInput(format!("operation {} is being synced", short_id(&id)))
    })?;
    println!("Removed {} {} {}/{}", short_id(&op.id), op.kind, op.entity_type, op.entity_id);
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
