// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use resync_core::Conflict;

use crate::cli::OutputFormat;
use crate::display::format_conflict;
use crate::error::Result;
use crate::sync::SyncEngine;

use super::{open_local, print_json};

pub fn list(state_dir: &Path, all: bool, output: OutputFormat) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    list_impl(&engine, all, output)
}

pub(crate) fn select(engine: &SyncEngine, all: bool) -> Vec<Conflict> {
    if all {
        engine.conflicts()
    } else {
        engine.unresolved_conflicts()
    }
}

pub(crate) fn list_impl(engine: &SyncEngine, all: bool, output: OutputFormat) -> Result<()> {
    let conflicts = select(engine, all);
    match output {
        OutputFormat::Json => print_json(&conflicts),
        OutputFormat::Text => {
            if conflicts.is_empty() {
                println!("No conflicts.");
            }
            for conflict in &conflicts {
                for line in format_conflict(conflict) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

pub fn prune(state_dir: &Path) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    let removed = engine.prune_resolved_conflicts()?;
    println!("Pruned {removed} resolved conflict(s)");
    Ok(())
}

#[cfg(test)]
#[path = "conflicts_tests.rs"]
mod tests;
