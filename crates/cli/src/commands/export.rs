// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::sync::SyncEngine;

use super::{open_local, print_json};

pub fn run(state_dir: &Path, path: Option<&Path>) -> Result<()> {
    let (_workspace, engine) = open_local(state_dir)?;
    match path {
        Some(path) => {
            let count = run_impl(&engine, path)?;
            eprintln!("Exported {} operations to {}", count, path.display());
            Ok(())
        }
        None => print_json(&engine.export_snapshot()),
    }
}

/// Write the snapshot to `path`, returning the number of operations.
pub(crate) fn run_impl(engine: &SyncEngine, path: &Path) -> Result<usize> {
    let snapshot = engine.export_snapshot();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(snapshot.operations.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
