// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

/// Strip all ANSI escape sequences from a string
fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[test]
fn test_fg256_format() {
    assert_eq!(fg256(74), "\x1b[38;5;74m");
    assert_eq!(fg256(0), "\x1b[38;5;0m");
}

#[test]
fn test_paint_keeps_text() {
    // Whether or not colors are on, the visible text is unchanged.
    assert_eq!(strip_ansi(&header("Queue")), "Queue");
    assert_eq!(strip_ansi(&literal("sync")), "sync");
    assert_eq!(strip_ansi(&context("abc123")), "abc123");
}

#[test]
fn test_status_labels() {
    assert_eq!(
        strip_ansi(&operation_status(OperationStatus::Failed)),
        "failed"
    );
    assert_eq!(strip_ansi(&sync_status(SyncStatus::Error)), "error");
}

#[test]
fn test_codes_are_distinct() {
    let all = [
        codes::HEADER,
        codes::LITERAL,
        codes::CONTEXT,
        codes::OK,
        codes::ALERT,
    ];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
