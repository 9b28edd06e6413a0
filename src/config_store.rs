// Dashboard config persisted as one JSON file, replaced atomically (temp file + rename).

use serde_json::{Value, json};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config store I/O on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Returned by GET /api/config when nothing has been stored yet.
pub fn default_config() -> Value {
    json!({
        "appTitle": "",
        "services": [],
        "newsFeeds": [],
    })
}

/// The config document is an unvalidated pass-through blob; only durability is guaranteed.
/// Concurrent writers are last-writer-wins.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(repo = "config", operation = "load"))]
    pub async fn load(&self) -> Result<Value, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_blocking(&path)).await?
    }

    #[instrument(skip(self, config), fields(repo = "config", operation = "save"))]
    pub async fn save(&self, config: Value) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || save_blocking(&path, &config)).await?
    }

    /// Removes the stored config; succeeds when there is none.
    #[instrument(skip(self), fields(repo = "config", operation = "delete"))]
    pub async fn delete(&self) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || delete_blocking(&path)).await?
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn load_blocking(path: &Path) -> Result<Value, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_config()),
        Err(e) => Err(io_err(path)(e)),
    }
}

fn save_blocking(path: &Path, config: &Value) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;

    // Same directory as the target so the rename never crosses filesystems.
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    serde_json::to_writer_pretty(&mut tmp, config)?;
    tmp.write_all(b"\n").map_err(io_err(path))?;
    tmp.as_file().sync_all().map_err(io_err(path))?;
    tmp.persist(path).map_err(|e| io_err(path)(e.error))?;
    tracing::debug!("config written to {}", path.display());
    Ok(())
}

fn delete_blocking(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path)(e)),
    }
}
