// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One forced pass against the configured remote.

use std::path::Path;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::cli::OutputFormat;
use crate::display::format_report;
use crate::error::{Error, Result};
use crate::sync::{PassReport, SyncEngine, SyncEvent};
use crate::workspace::Workspace;

use super::print_json;

pub fn run(state_dir: &Path, events: bool, output: OutputFormat) -> Result<()> {
    let workspace = Workspace::open(state_dir)?;
    let engine = workspace.engine(workspace.remote()?)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (report, seen) = runtime.block_on(run_pass(&engine))?;

    if events {
        for event in &seen {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => println!("{}", format_report(&report)),
    }
    outcome(&report)
}

/// Go online, run a pass and collect the events it emitted.
pub(crate) async fn run_pass(engine: &SyncEngine) -> Result<(PassReport, Vec<SyncEvent>)> {
    let mut rx = engine.subscribe();
    engine.set_online(true);
    let result = engine.force_sync().await;
    engine.set_online(false);
    let seen = drain(&mut rx);
    Ok((result?, seen))
}

fn drain(rx: &mut broadcast::Receiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut seen = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => seen.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event buffer overflowed");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    seen
}

/// Exit status for a finished pass.
pub(crate) fn outcome(report: &PassReport) -> Result<()> {
    if report.authentication_required {
        return Err(Error::AuthenticationRequired);
    }
    if report.is_stuck() {
        return Err(Error::SyncStalled {
            failed: report.failed,
            requeued: report.requeued,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
