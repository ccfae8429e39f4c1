// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State directory layout and engine construction.
//!
//! ```text
//! <state_dir>/
//!   config.toml
//!   resync.lock          exclusive lock held while a command runs
//!   operations.jsonl     jsonl backend
//!   conflicts.jsonl
//!   resync.db            sqlite backend (tables keyed by collection)
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use resync_core::{Collection, Conflict, JsonlCollection, Operation, SqliteCollection};

use crate::config::{Backend, Config, RemoteConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::sync::{
    ConflictStore, HttpRemote, OperationQueue, Remote, RetryPolicy, SyncEngine, Unconfigured,
};

const LOCK_FILE_NAME: &str = "resync.lock";
const DB_FILE_NAME: &str = "resync.db";
const OPERATIONS: &str = "operations";
const CONFLICTS: &str = "conflicts";

type Stores = (Box<dyn Collection<Operation>>, Box<dyn Collection<Conflict>>);

/// An opened state directory. Holds the lock until dropped.
pub struct Workspace {
    dir: PathBuf,
    config: Config,
    _lock: File,
}

impl Workspace {
    /// Create a state directory with a default configuration.
    pub fn init(dir: &Path, backend: Backend, remote_url: Option<String>) -> Result<Self> {
        if dir.join(CONFIG_FILE_NAME).exists() {
            return Err(Error::AlreadyInitialized(dir.display().to_string()));
        }
        let mut config = Config::default();
        config.storage.backend = backend;
        config.remote = remote_url.map(RemoteConfig::new);
        config.validate()?;

        fs::create_dir_all(dir)?;
        config.save(dir)?;

        let workspace = Workspace::open(dir)?;
        let (mut operations, mut conflicts) = workspace.stores()?;
        operations.save(&[])?;
        conflicts.save(&[])?;
        Ok(workspace)
    }

    /// Open an initialized state directory and take its lock.
    pub fn open(dir: &Path) -> Result<Self> {
        let config = Config::load(dir)?;
        let lock = acquire_lock(&dir.join(LOCK_FILE_NAME))?;
        tracing::debug!(dir = %dir.display(), backend = ?config.storage.backend, "state opened");
        Ok(Workspace {
            dir: dir.to_path_buf(),
            config,
            _lock: lock,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn stores(&self) -> Result<Stores> {
        Ok(match self.config.storage.backend {
            Backend::Jsonl => (
                Box::new(JsonlCollection::<Operation>::open(
                    &self.dir.join(format!("{OPERATIONS}.jsonl")),
                )),
                Box::new(JsonlCollection::<Conflict>::open(
                    &self.dir.join(format!("{CONFLICTS}.jsonl")),
                )),
            ),
            Backend::Sqlite => {
                let db = self.dir.join(DB_FILE_NAME);
                (
                    Box::new(SqliteCollection::<Operation>::open(&db, OPERATIONS)?),
                    Box::new(SqliteCollection::<Conflict>::open(&db, CONFLICTS)?),
                )
            }
        })
    }

    /// Build an engine over the persisted state.
    pub fn engine(&self, remote: Arc<dyn Remote>) -> Result<SyncEngine> {
        let (operations, conflicts) = self.stores()?;
        let retry = self.config.retry.to_retry_config();
        let queue = OperationQueue::open(operations, retry.retries)?;
        let conflicts = ConflictStore::open(conflicts)?;
        Ok(SyncEngine::new(
            remote,
            queue,
            conflicts,
            RetryPolicy::new(retry),
        ))
    }

    /// Engine for commands that never talk to the remote.
    pub fn local_engine(&self) -> Result<SyncEngine> {
        self.engine(Arc::new(Unconfigured))
    }

    /// The configured HTTP remote.
    pub fn remote(&self) -> Result<Arc<dyn Remote>> {
        let remote = self.config.remote.as_ref().ok_or(Error::NoRemote)?;
        let http = HttpRemote::new(&remote.url, remote.token(), remote.timeout())?;
        Ok(Arc::new(http))
    }
}

fn acquire_lock(lock_path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::Locked(lock_path.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
