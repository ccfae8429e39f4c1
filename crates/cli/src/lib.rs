// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! resync - offline-first operation queue with conflict-aware sync.
//!
//! This crate provides the `resync` CLI and the sync engine behind it.
//! Local mutations are recorded as operations in a persisted queue and
//! replayed against a REST remote once connectivity is available.
//!
//! # Main Components
//!
//! - [`sync::SyncEngine`] - Scheduler owning the queue, conflicts and retry policy
//! - [`workspace::Workspace`] - A locked state directory and its stores
//! - [`Config`] - Remote, retry and storage settings (`config.toml`)
//! - [`Error`] - Error types for all commands
//!
//! # Embedding
//!
//! ```rust,ignore
//! use resync::workspace::Workspace;
//!
//! let workspace = Workspace::open(&state_dir)?;
//! let engine = workspace.engine(workspace.remote()?)?;
//! engine.set_online(true);
//! let report = engine.force_sync().await?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod help;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;
pub mod workspace;

pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without a process.
pub fn run(cli: Cli) -> Result<()> {
    // Needs no state directory.
    if let Command::Schema = cli.command {
        return commands::schema::run();
    }

    let state_dir = config::resolve_state_dir(cli.state_dir)?;
    let dir = state_dir.as_path();
    tracing::debug!(state_dir = %dir.display(), "resolved state directory");

    match cli.command {
        Command::Enqueue {
            kind,
            entity_type,
            entity_id,
            data,
            output,
        } => commands::enqueue::run(dir, kind, entity_type, entity_id, data, output),
        Command::List { status, output } => commands::list::run(dir, status, output),
        Command::Retry { id } => commands::queue::retry(dir, &id),
        Command::Remove { id } => commands::queue::remove(dir, &id),
        Command::Conflicts { all, output } => commands::conflicts::list(dir, all, output),
        Command::Resolve {
            id,
            resolution,
            data,
        } => commands::resolve::run(dir, &id, resolution, data),
        Command::ResolveAll { resolution } => commands::resolve::run_all(dir, resolution),
        Command::Prune => commands::conflicts::prune(dir),
        Command::Init { backend, remote } => commands::init::run(dir, backend, remote),
        Command::Status { output } => commands::status::run(dir, output),
        Command::Sync { events, output } => commands::sync::run(dir, events, output),
        Command::Export { path } => commands::export::run(dir, path.as_deref()),
        Command::Schema => commands::schema::run(),
    }
}
