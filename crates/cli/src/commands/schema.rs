// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON Schema of the `export` snapshot.

use resync_core::StateSnapshot;
use schemars::schema_for;

use crate::error::Result;

pub fn run() -> Result<()> {
    let schema = schema_for!(StateSnapshot);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
