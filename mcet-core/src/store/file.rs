use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Store, StorePath, new_push_key, tree};
use crate::error::{McetError, McetResult};

/// Store persisted as a single JSON document on disk.
///
/// Writes hold an exclusive lock on `<file>.lock` from read to rename, so
/// any number of processes or instances can share one file. The new
/// document is written to a unique temp file next to it and renamed over
/// the old one, so readers never see half a document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update(&self, path: &StorePath, value: Value) -> McetResult<()> {
        let file = self.path.clone();
        let path = path.clone();
        tokio::task::spawn_blocking(move || update_locked(&file, &path, value))
            .await
            .map_err(|e| McetError::Io(std::io::Error::other(e)))?
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get(&self, path: &StorePath) -> McetResult<Option<Value>> {
        let file = self.path.clone();
        let root = tokio::task::spawn_blocking(move || read_document(&file))
            .await
            .map_err(|e| McetError::Io(std::io::Error::other(e)))??;
        Ok(tree::lookup(&root, path))
    }

    async fn set(&self, path: &StorePath, value: Value) -> McetResult<()> {
        debug!(file = %self.path.display(), %path, "file store set");
        self.update(path, value).await
    }

    async fn push(&self, path: &StorePath, value: Value) -> McetResult<String> {
        let key = new_push_key();
        let child = path.child(&key)?;
        debug!(file = %self.path.display(), path = %child, "file store push");

        self.update(&child, value).await?;
        Ok(key)
    }
}

fn parent_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn lock_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn read_document(file: &Path) -> McetResult<Value> {
    match fs::read_to_string(file) {
        Ok(content) if content.trim().is_empty() => Ok(Value::Null),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Value::Null),
        Err(e) => Err(e.into()),
    }
}

fn update_locked(file: &Path, path: &StorePath, value: Value) -> McetResult<()> {
    let dir = parent_dir(file);
    fs::create_dir_all(dir)?;

    // Released when `lock` is dropped.
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(file))?;
    lock.lock_exclusive()?;

    let mut root = read_document(file)?;
    tree::write(&mut root, path, value);

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, &root)?;
    temp.persist(file).map_err(|e| McetError::Io(e.error))?;
    Ok(())
}
