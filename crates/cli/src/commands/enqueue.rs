// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use resync_core::{EntityType, NewOperation, Operation, OperationKind};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::display::short_id;
use crate::error::{Error, Result};
use crate::sync::SyncEngine;

use super::{open_local, parse_record, print_json};

pub fn run(
    state_dir: &Path,
    kind: OperationKind,
    entity_type: EntityType,
    entity_id: Option<String>,
    data: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let intent = build_intent(kind, entity_type, entity_id, data.as_deref())?;
    let (_workspace, engine) = open_local(state_dir)?;
    run_impl(&engine, intent, output)
}

/// Turn command-line arguments into an operation intent.
pub(crate) fn build_intent(
    kind: OperationKind,
    entity_type: EntityType,
    entity_id: Option<String>,
    data: Option<&str>,
) -> Result<NewOperation> {
    let record = data.map(parse_record).transpose()?;
    match kind {
        OperationKind::Create => {
            let intent = NewOperation::create(entity_type, record.unwrap_or_else(|| json!({})));
            Ok(match entity_id {
                Some(id) => intent.with_entity_id(id),
                None => intent,
            })
        }
        OperationKind::Update => {
            let id = entity_id.ok_or_else(|| {
                Error::InvalidInput("update needs an entity id".to_string())
            })?;
            let patch = record.ok_or_else(|| {
                Error::InvalidInput("update needs --data with the changed fields".to_string())
            })?;
            Ok(NewOperation::update(entity_type, id, patch))
        }
        OperationKind::Delete => {
            if record.is_some() {
                return Err(Error::InvalidInput("delete takes no --data".to_string()));
            }
            let id = entity_id.ok_or_else(|| {
                Error::InvalidInput("delete needs an entity id".to_string())
            })?;
            Ok(NewOperation::delete(entity_type, id))
        }
    }
}

pub(crate) fn run_impl(engine: &SyncEngine, intent: NewOperation, output: OutputFormat) -> Result<()> {
    let op = engine.enqueue(intent)?;
    match output {
        OutputFormat::Json => print_json(&op),
        OutputFormat::Text => {
            println!("{}", describe(&op));
            Ok(())
        }
    }
}

fn describe(op: &Operation) -> String {
    let mut line = format!(
        "Queued {} {} {}/{}",
        short_id(&op.id),
        op.kind,
        op.entity_type,
        op.entity_id
    );
    if op.data.as_object().is_some_and(|fields| !fields.is_empty()) {
        line.push(' ');
        line.push_str(&op.data.to_string());
    }
    line
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
