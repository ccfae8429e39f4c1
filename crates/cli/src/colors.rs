// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use resync_core::{OperationStatus, SyncStatus};

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Default values/context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Healthy states: soft green
    pub const OK: u8 = 108;
    /// States needing attention: soft red
    pub const ALERT: u8 = 167;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Format a 256-color ANSI escape sequence for foreground color.
fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(code), text, RESET)
    } else {
        text.to_string()
    }
}

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Apply literal color (commands, options) to text.
pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

/// Apply context color (ids, timestamps, hints) to text.
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Color an operation status by severity.
pub fn operation_status(status: OperationStatus) -> String {
    let code = match status {
        OperationStatus::Pending | OperationStatus::Syncing => codes::LITERAL,
        OperationStatus::Completed => codes::OK,
        OperationStatus::Failed => codes::ALERT,
    };
    paint(code, status.as_str())
}

/// Color the scheduler status by severity.
pub fn sync_status(status: SyncStatus) -> String {
    let code = match status {
        SyncStatus::Idle => codes::OK,
        SyncStatus::Syncing => codes::LITERAL,
        SyncStatus::Error => codes::ALERT,
    };
    paint(code, status.as_str())
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
