// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level help layout and styles.

use clap::builder::styling::Styles;

use crate::colors;

/// Clap styles matching the color palette, or plain when colors are off.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help, grouped by concern.
pub fn commands() -> String {
    let row = |name: &str, pad: usize, about: &str| {
        format!("  {}{}{}\n", colors::literal(name), " ".repeat(pad), about)
    };
    let mut out = String::new();

    out.push_str(&colors::header("Queue:"));
    out.push('\n');
    out.push_str(&row("enqueue", 6, "Record a local mutation"));
    out.push_str(&row("list", 9, "List queued operations"));
    out.push_str(&row("retry", 8, "Requeue a failed operation"));
    out.push_str(&row("remove", 7, "Drop a queued operation"));
    out.push('\n');

    out.push_str(&colors::header("Conflicts:"));
    out.push('\n');
    out.push_str(&row("conflicts", 4, "List conflicts"));
    out.push_str(&row("resolve", 6, "Resolve one conflict"));
    out.push_str(&row("resolve-all", 2, "Resolve every open conflict"));
    out.push_str(&row("prune", 8, "Drop resolved conflicts"));
    out.push('\n');

    out.push_str(&colors::header("Sync & Setup:"));
    out.push('\n');
    out.push_str(&row("init", 9, "Create a state directory"));
    out.push_str(&row("status", 7, "Show sync status and counts"));
    out.push_str(&row("sync", 9, "Replay the queue against the remote"));
    out.push_str(&row("export", 7, "Write a diagnostic snapshot"));
    out.push_str(&row("schema", 7, "Print the snapshot JSON Schema"));
    out
}

/// Quickstart shown after options in main help.
pub fn quickstart() -> String {
    format!(
        "{}
  resync init --remote https://api.example.com/v1
  resync enqueue update task t1 --data '{{\"status\":\"DONE\"}}'
  resync sync
  resync conflicts",
        colors::header("Get started:")
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
