// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use resync_core::{Operation, OperationStatus};

use crate::cli::OutputFormat;
use crate::display::format_operation;
use crate::error::Result;
use crate::sync::SyncEngine;

use super::{open_local, print_json};

pub fn run(state_dir: &Path, status: Option<OperationStatus>, output: OutputFormat) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    run_impl(&engine, status, output)
}

/// Queue contents in order, or the operations with `status`.
pub(crate) fn select(engine: &SyncEngine, status: Option<OperationStatus>) -> Vec<Operation> {
    match status {
        Some(status) => engine.list_by_status(status),
        None => engine.operations(),
    }
}

pub(crate) fn run_impl(
    engine: &SyncEngine,
    status: Option<OperationStatus>,
    output: OutputFormat,
) -> Result<()> {
    let ops = select(engine, status);
    match output {
        OutputFormat::Json => print_json(&ops),
        OutputFormat::Text => {
            if ops.is_empty() {
                println!("No operations.");
            }
            for op in &ops {
                for line in format_operation(op) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
