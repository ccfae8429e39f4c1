// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed collection storage.
//!
//! All collections share one `records` table keyed by `(collection, id)`.
//! Records are stored as JSON bodies with an explicit position so the
//! snapshot order survives a reload.

use rusqlite::{params, Connection};
use std::marker::PhantomData;
use std::path::Path;

use super::{Collection, Record};
use crate::error::{Error, Result};

/// SQL schema for collection storage.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    position INTEGER NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_records_position ON records(collection, position);
"#;

/// A [`Collection`] stored in a SQLite database.
pub struct SqliteCollection<T> {
    conn: Connection,
    name: String,
    _record: PhantomData<fn() -> T>,
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "invalid collection name '{name}'"
        )))
    }
}

impl<T> SqliteCollection<T> {
    /// Open (or create) the collection `name` in the database at `path`.
    pub fn open(path: &Path, name: &str) -> Result<Self> {
        validate_name(name)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteCollection {
            conn,
            name: name.to_string(),
            _record: PhantomData,
        })
    }

    /// Open the collection in a private in-memory database.
    pub fn open_in_memory(name: &str) -> Result<Self> {
        validate_name(name)?;
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteCollection {
            conn,
            name: name.to_string(),
            _record: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Record> Collection<T> for SqliteCollection<T> {
    fn load(&self) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, body FROM records WHERE collection = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map([&self.name], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let record: T = serde_json::from_str(&body).map_err(|e| {
                Error::CorruptedData(format!("{} record '{id}': {e}", self.name))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records WHERE collection = ?1", [&self.name])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO records (collection, id, position, body) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, record) in records.iter().enumerate() {
                let body = serde_json::to_string(record)?;
                insert.execute(params![
                    &self.name,
                    record.record_id(),
                    position as i64,
                    body
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
