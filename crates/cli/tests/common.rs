// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// State directory inside a temp dir.
pub fn state_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("state")
}

/// `resync` pointed at `temp`'s state directory, colors off.
pub fn resync(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("resync");
    cmd.env("RESYNC_STATE_DIR", state_dir(temp))
        .env("NO_COLOR", "1")
        .env_remove("RESYNC_LOG")
        .env_remove("RESYNC_TOKEN");
    cmd
}

/// Helper to create an initialized temp state directory
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    resync(&temp).arg("init").assert().success();
    temp
}

/// Initialized state directory whose remote is `url` and which never retries.
pub fn init_with_remote(url: &str) -> TempDir {
    let temp = init_temp();
    let config = format!("[remote]\nurl = \"{url}\"\ntimeout_secs = 2\n\n[retry]\nretries = 0\n");
    std::fs::write(state_dir(&temp).join("config.toml"), config).unwrap();
    temp
}

/// Enqueue an operation and return its full id.
pub fn enqueue(temp: &TempDir, args: &[&str]) -> String {
    let output = resync(temp)
        .arg("enqueue")
        .args(args)
        .args(["-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let op: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    op["id"].as_str().unwrap().to_string()
}

/// Parse a command's stdout as JSON.
pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}
