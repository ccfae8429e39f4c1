// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) storage.
//!
//! Each record is stored as a single JSON line. Snapshots are written to a
//! sibling temp file, fsynced, then renamed over the original so a crash
//! mid-write leaves either the old or the new snapshot, never a mix.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::{Collection, Record};
use crate::error::{Error, Result};

/// Reads all records from a JSONL file.
///
/// Skips empty lines and returns an empty vec if the file doesn't exist.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line).map_err(|e| {
            Error::CorruptedData(format!("{}:{}: {e}", path.display(), index + 1))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Writes all records to a JSONL file, atomically replacing existing content.
pub fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    {
        let mut file = File::create(&tmp_path)?;
        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(file, "{json}")?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// A [`Collection`] stored as a JSONL file.
pub struct JsonlCollection<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonlCollection<T> {
    /// Use the JSONL file at `path`. The file is created on first save.
    pub fn open(path: &Path) -> Self {
        JsonlCollection {
            path: path.to_path_buf(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Record> Collection<T> for JsonlCollection<T> {
    fn load(&self) -> Result<Vec<T>> {
        read_all(&self.path)
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        write_all(&self.path, records)
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
