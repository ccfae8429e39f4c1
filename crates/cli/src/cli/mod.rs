// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use resync_core::{EntityType, OperationKind, OperationStatus, Resolution};

use crate::config::Backend;
use crate::help;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "resync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first operation queue with conflict-aware sync")]
#[command(
    long_about = "Offline-first operation queue with conflict-aware sync.\n\n\
    Local mutations are queued durably and replayed against a REST remote \
    with exponential backoff. Version conflicts are kept for resolution."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// State directory [default: $RESYNC_STATE_DIR or the platform data dir]
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Record a local mutation
    #[command(after_help = "\
Examples:
  resync enqueue create task --data '{\"title\":\"Write docs\"}'
  resync enqueue update task t1 --data '{\"status\":\"DONE\"}'
  resync enqueue delete project p7")]
    Enqueue {
        /// Mutation kind (create, update, delete)
        kind: OperationKind,

        /// Entity category (task, project, workspace, session, ...)
        entity_type: EntityType,

        /// Target entity; omitted for create to get a provisional id
        #[arg(value_parser = non_empty_string)]
        entity_id: Option<String>,

        /// Record (create) or patch (update) as a JSON object
        #[arg(long, short)]
        data: Option<String>,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List queued operations
    List {
        /// Only operations with this status (completed shows recent history)
        #[arg(long, short)]
        status: Option<OperationStatus>,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Requeue a failed operation with a fresh retry budget
    Retry {
        /// Operation id or unique prefix
        id: String,
    },

    /// Drop a queued operation
    Remove {
        /// Operation id or unique prefix
        id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Conflicts
    // ─────────────────────────────────────────────────────────────────────────
    /// List conflicts (unresolved only by default)
    Conflicts {
        /// Include resolved conflicts
        #[arg(long)]
        all: bool,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Resolve one conflict
    #[command(after_help = "\
Strategies:
  local     Push the local record over the remote
  remote    Accept the remote record
  merge     Push the record given with --data
  manual    Leave it for later")]
    Resolve {
        /// Conflict id or unique prefix
        id: String,

        resolution: Resolution,

        /// Merged record, required for merge
        #[arg(long, short)]
        data: Option<String>,
    },

    /// Apply one strategy to every unresolved conflict
    ResolveAll {
        /// local, remote or manual
        resolution: Resolution,
    },

    /// Delete resolved conflicts from storage
    Prune,

    // ─────────────────────────────────────────────────────────────────────────
    // Sync & Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Create a state directory
    Init {
        /// Storage backend for the queue and conflicts
        #[arg(long, value_enum, default_value_t)]
        backend: Backend,

        /// REST base URL of the remote
        #[arg(long, value_name = "url")]
        remote: Option<String>,
    },

    /// Show sync status and counts
    Status {
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Replay the queue against the configured remote once
    Sync {
        /// Print engine events as JSON lines
        #[arg(long)]
        events: bool,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Write the full queue and conflict state as JSON
    Export {
        /// Output file (stdout when omitted)
        path: Option<PathBuf>,
    },

    /// Print the JSON Schema of the export snapshot
    Schema,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
