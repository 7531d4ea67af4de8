//! Hierarchical document store contract.
//!
//! The attendance and event data lives in a shared key/value tree (a hosted
//! realtime database in production). Repositories only ever see the three
//! operations of [`Store`], so tests and the CLI can plug in their own
//! backends.

mod file;
mod memory;
mod path;
mod push_key;
mod tree;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use path::StorePath;
pub use push_key::new_push_key;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::McetResult;

#[async_trait]
pub trait Store: Send + Sync {
    /// Read the subtree at `path`. Missing or empty subtrees are `None`.
    async fn get(&self, path: &StorePath) -> McetResult<Option<Value>>;

    /// Overwrite the value at `path`. Writing `null` removes it.
    async fn set(&self, path: &StorePath, value: Value) -> McetResult<()>;

    /// Append `value` under `path` with a fresh, time-ordered child key and
    /// return that key.
    async fn push(&self, path: &StorePath, value: Value) -> McetResult<String>;
}
