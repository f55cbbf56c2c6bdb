pub mod project;
pub mod seed;
pub mod task;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

const MIGRATION: &str = include_str!("../../migrations/001_init.sql");

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating parent directories as needed.
    /// Enables WAL mode and foreign key enforcement.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if mode != "wal" {
            anyhow::bail!("failed to enable WAL mode, got: {mode}");
        }
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Default database location.
    /// Uses `TASKFLOW_DB` env var if set, otherwise `~/.taskflow/taskflow.db`.
    pub fn default_path() -> Result<PathBuf> {
        match std::env::var("TASKFLOW_DB") {
            Ok(p) => Ok(PathBuf::from(p)),
            Err(_) => {
                let home = std::env::var("HOME").context("HOME environment variable not set")?;
                Ok(PathBuf::from(home).join(".taskflow").join("taskflow.db"))
            }
        }
    }

    /// Run all migrations. Idempotent thanks to `IF NOT EXISTS` clauses.
    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(MIGRATION)
            .context("failed to run database migration")?;
        Ok(())
    }

    /// Access the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Shared handle for async request handlers.
///
/// SQLite access is synchronous, so every call runs on tokio's blocking pool
/// while holding the mutex.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<Mutex<Database>>,
}

impl DbHandle {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Database) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|e| anyhow::anyhow!("database lock poisoned: {e}"))?;
            f(&guard)
        })
        .await
        .context("database task panicked")?
    }
}
