//! Backing Store - File Read Port
//!
//! The raw "read bytes of file F from directory D" primitive behind the
//! cache. Pluggable so tests can swap in an in-memory store with
//! controllable latency.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Cache Actor / Reader                     │
//! │                  ┌─────────────────────┐                     │
//! │                  │  BackingStore trait  │                    │
//! │                  └─────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FsBackingStore (production) │ InMemoryBackingStore (tests) │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::error::{Error, Result};

/// Backing store trait - produces file bytes for a normalized relative path
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Read the full content of `filename`.
    ///
    /// A read, once started, cannot be canceled; callers that stop waiting
    /// must let it run to completion.
    async fn read(&self, filename: &str) -> Result<Bytes>;
}

// =============================================================================
// Filesystem Store
// =============================================================================

/// Filesystem-backed store rooted at a configured directory
pub struct FsBackingStore {
    /// Directory the files are hosted in
    root: PathBuf,
}

impl FsBackingStore {
    /// Create a new store serving files under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory this store serves from
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl BackingStore for FsBackingStore {
    async fn read(&self, filename: &str) -> Result<Bytes> {
        let path = self.root.join(filename);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) => Err(Error::ReadFailed {
                filename: filename.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

// =============================================================================
// In-Memory Store (for testing)
// =============================================================================

/// In-memory backing store for testing.
/// Uses DashMap for lock-free concurrent access and supports an artificial
/// per-read delay to exercise timeout paths.
pub struct InMemoryBackingStore {
    /// Stored files (filename -> content)
    files: DashMap<String, Bytes>,
    /// Artificial latency applied to every read
    delay: parking_lot::RwLock<Option<Duration>>,
    /// Number of reads issued (successful or not)
    reads: AtomicU64,
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self {
            files: DashMap::new(),
            delay: parking_lot::RwLock::new(None),
            reads: AtomicU64::new(0),
        }
    }
}

impl InMemoryBackingStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file
    pub fn insert(&self, filename: impl Into<String>, data: impl Into<Bytes>) {
        self.files.insert(filename.into(), data.into());
    }

    /// Remove a file
    pub fn remove(&self, filename: &str) -> bool {
        self.files.remove(filename).is_some()
    }

    /// Apply an artificial latency to every subsequent read
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Number of reads issued against this store
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn read(&self, filename: &str) -> Result<Bytes> {
        self.reads.fetch_add(1, Ordering::Relaxed);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.files.get(filename) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(Error::ReadFailed {
                filename: filename.to_string(),
                reason: "no such file".to_string(),
            }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
