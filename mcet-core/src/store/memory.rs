use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::trace;

use super::{Store, StorePath, new_push_key, tree};
use crate::error::{McetError, McetResult};

/// Store held entirely in memory. Shared between sessions through `Arc`, it
/// behaves like one backend that several clients talk to.
///
/// `set_offline(true)` makes every call fail with `NetworkUnavailable`, to
/// exercise failure and rollback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RwLock<Value>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Start from an existing document, e.g. a fixture.
    pub fn with_document(root: Value) -> Self {
        MemoryStore {
            root: RwLock::new(root),
            ..MemoryStore::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Value {
        self.root.read().await.clone()
    }

    fn check_online(&self, path: &StorePath) -> McetResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(McetError::NetworkUnavailable(format!(
                "memory store is offline ({})",
                path
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, path: &StorePath) -> McetResult<Option<Value>> {
        self.check_online(path)?;
        let root = self.root.read().await;
        Ok(tree::lookup(&root, path))
    }

    async fn set(&self, path: &StorePath, value: Value) -> McetResult<()> {
        self.check_online(path)?;
        trace!(%path, "memory store set");
        let mut root = self.root.write().await;
        tree::write(&mut root, path, value);
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> McetResult<String> {
        self.check_online(path)?;
        let key = new_push_key();
        let child = path.child(&key)?;
        trace!(%child, "memory store push");

        let mut root = self.root.write().await;
        tree::write(&mut root, &child, value);
        Ok(key)
    }
}
