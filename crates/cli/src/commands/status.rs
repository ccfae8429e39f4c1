// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use resync_core::{OperationStatus, SyncStatus};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::display::format_status;
use crate::error::Result;
use crate::sync::SyncEngine;

use super::{open_local, print_json};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusJson {
    pub status: SyncStatus,
    pub is_online: bool,
    pub progress: u8,
    pub pending: usize,
    pub syncing: usize,
    pub failed: usize,
    pub unresolved_conflicts: usize,
}

pub fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    run_impl(&engine, output)
}

pub(crate) fn summarize(engine: &SyncEngine) -> StatusJson {
    let snapshot = engine.export_snapshot();
    StatusJson {
        status: snapshot.sync_status,
        is_online: snapshot.is_online,
        progress: snapshot.progress,
        pending: snapshot.count(OperationStatus::Pending),
        syncing: snapshot.count(OperationStatus::Syncing),
        failed: snapshot.count(OperationStatus::Failed),
        unresolved_conflicts: snapshot.unresolved_conflicts(),
    }
}

pub(crate) fn run_impl(engine: &SyncEngine, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&summarize(engine)),
        OutputFormat::Text => {
            for line in format_status(&engine.export_snapshot()) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
