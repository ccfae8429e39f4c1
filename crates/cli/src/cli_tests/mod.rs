// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn test_enqueue_update() {
    let cli = parse(&[
        "resync", "enqueue", "update", "task", "t1", "--data", r#"{"a":1}"#,
    ])
    .unwrap();
    let Command::Enqueue {
        kind,
        entity_type,
        entity_id,
        data,
        output,
    } = cli.command
    else {
        unreachable!("expected enqueue");
    };
    assert_eq!(kind, OperationKind::Update);
    assert_eq!(entity_type, EntityType::Task);
    assert_eq!(entity_id.as_deref(), Some("t1"));
    assert_eq!(data.as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(output, OutputFormat::Text);
}

#[test]
fn test_enqueue_unknown_entity_type_is_kept() {
    let cli = parse(&["resync", "enqueue", "create", "invoice"]).unwrap();
    let Command::Enqueue {
        entity_type,
        entity_id,
        ..
    } = cli.command
    else {
        unreachable!("expected enqueue");
    };
    assert_eq!(entity_type, EntityType::Other("invoice".into()));
    assert!(entity_id.is_none());
}

#[parameterized(
    bad_kind = { &["resync", "enqueue", "upsert", "task", "t1"] },
    empty_id = { &["resync", "enqueue", "update", "task", " "] },
    bad_status = { &["resync", "list", "--status", "done"] },
    bad_resolution = { &["resync", "resolve", "c1", "theirs"] },
    bad_backend = { &["resync", "init", "--backend", "postgres"] },
    bad_output = { &["resync", "status", "-o", "yaml"] },
)]
fn test_rejected_arguments(args: &[&str]) {
    assert!(parse(args).is_err());
}

#[test]
fn test_list_status_filter() {
    let cli = parse(&["resync", "list", "-s", "failed", "-o", "json"]).unwrap();
    let Command::List { status, output } = cli.command else {
        unreachable!("expected list");
    };
    assert_eq!(status, Some(OperationStatus::Failed));
    assert_eq!(output, OutputFormat::Json);
}

#[test]
fn test_resolve_with_data() {
    let cli = parse(&["resync", "resolve", "abc", "merge", "-d", "{}"]).unwrap();
    let Command::Resolve {
        id,
        resolution,
        data,
    } = cli.command
    else {
        unreachable!("expected resolve");
    };
    assert_eq!(id, "abc");
    assert_eq!(resolution, Resolution::Merge);
    assert_eq!(data.as_deref(), Some("{}"));
}

#[test]
fn test_init_defaults() {
    let cli = parse(&["resync", "init"]).unwrap();
    let Command::Init { backend, remote } = cli.command else {
        unreachable!("expected init");
    };
    assert_eq!(backend, Backend::Jsonl);
    assert!(remote.is_none());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["resync", "status", "--state-dir", "/tmp/s", "-vv"]).unwrap();
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
    assert_eq!(cli.verbose, 2);
}

#[test]
fn test_sync_flags() {
    let cli = parse(&["resync", "sync", "--events"]).unwrap();
    let Command::Sync { events, output } = cli.command else {
        unreachable!("expected sync");
    };
    assert!(events);
    assert_eq!(output, OutputFormat::Text);
}
