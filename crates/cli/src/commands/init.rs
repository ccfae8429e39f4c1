// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::colors;
use crate::config::Backend;
use crate::error::Result;
use crate::workspace::Workspace;

pub fn run(state_dir: &Path, backend: Backend, remote: Option<String>) -> Result<()> {
    let workspace = Workspace::init(state_dir, backend, remote)?;

    println!("Initialized resync state at {}", workspace.dir().display());
    let config = workspace.config();
    println!(
        "  {} {:?}",
        colors::context("storage:"),
        config.storage.backend
    );
    match &config.remote {
        Some(remote) => println!("  {} {}", colors::context("remote:"), remote.url),
        None => println!(
            "  {} none (edit config.toml to add [remote])",
            colors::context("remote:")
        ),
    }
    Ok(())
}
