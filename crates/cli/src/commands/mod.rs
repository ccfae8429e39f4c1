// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod conflicts;
pub mod enqueue;
pub mod export;
pub mod init;
pub mod list;
pub mod queue;
pub mod resolve;
pub mod schema;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::sync::SyncEngine;
use crate::workspace::Workspace;

/// Open the state directory and an engine that stays offline.
///
/// The workspace must outlive the engine: it holds the directory lock.
pub fn open_local(state_dir: &Path) -> Result<(Workspace, SyncEngine)> {
    let workspace = Workspace::open(state_dir)?;
    let engine = workspace.local_engine()?;
    Ok((workspace, engine))
}

/// Resolve a full id from an exact id or a unique prefix.
pub fn resolve_id<'a>(
    kind: &'static str,
    prefix: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<String> {
    let mut matches = Vec::new();
    for id in ids {
        if id == prefix {
            return Ok(id.to_string());
        }
        if id.starts_with(prefix) {
            matches.push(id.to_string());
        }
    }
    match matches.len() {
        0 => Err(Error::NotFound {
            kind,
            id: prefix.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::AmbiguousId {
            kind,
            prefix: prefix.to_string(),
            matches,
        }),
    }
}

/// Parse a `--data` argument, which must be a JSON object.
pub fn parse_record(data: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| Error::InvalidInput(format!("invalid --data JSON: {e}")))?;
    if !value.is_object() {
        return Err(Error::InvalidInput(
            "--data must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
