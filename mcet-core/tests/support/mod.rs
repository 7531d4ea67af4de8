//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mcet_core::store::{MemoryStore, Store, StorePath};
use mcet_core::{CalendarDate, McetResult, Session, YearMonth};
use serde_json::Value;
use tokio::sync::watch;

pub fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::new(y, m, d).unwrap()
}

pub fn month(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

pub fn faculty() -> Session {
    Session::faculty("prof.rao@mcet.in").unwrap()
}

pub fn student() -> Session {
    Session::student("anu.s@mcet.in").unwrap()
}

/// Wraps a store and holds every `get` until the gate is opened, so tests
/// can decide when in-flight loads complete.
pub struct GatedStore {
    inner: Arc<MemoryStore>,
    gate: watch::Sender<bool>,
}

impl GatedStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        let (gate, _) = watch::channel(false);
        GatedStore { inner, gate }
    }

    pub fn open(&self) {
        self.gate.send_replace(true);
    }
}

#[async_trait]
impl Store for GatedStore {
    async fn get(&self, path: &StorePath) -> McetResult<Option<Value>> {
        let mut rx = self.gate.subscribe();
        // Sender lives as long as self, so this only returns once opened.
        let _ = rx.wait_for(|open| *open).await;
        self.inner.get(path).await
    }

    async fn set(&self, path: &StorePath, value: Value) -> McetResult<()> {
        self.inner.set(path, value).await
    }

    async fn push(&self, path: &StorePath, value: Value) -> McetResult<String> {
        self.inner.push(path, value).await
    }
}
