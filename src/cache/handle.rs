//! Cache Handle - Request Façade
//!
//! The synchronous-looking surface request handlers call. A handle owns the
//! current actor generation's inbox sender behind a lock; requests clone the
//! sender, send one message, and await a private oneshot reply.
//!
//! # Generations
//!
//! A clear is a generation handoff: send Close, await the drain ack, spawn a
//! fresh actor with the same configuration, swap the sender. A request that
//! races the handoff window, or a second concurrent clear, gets
//! [`Error::CacheClosed`] instead of deadlocking on a dead inbox.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::actor::CacheActor;
use super::message::{CacheMessage, StatusSnapshot};
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::store::BackingStore;

/// Cheap-clone façade over the current cache actor generation
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<Inner>,
}

struct Inner {
    /// Inbox of the live generation; swapped on clear
    inbox: RwLock<mpsc::Sender<CacheMessage>>,
    config: CacheConfig,
    store: Arc<dyn BackingStore>,
}

impl CacheHandle {
    /// Start the first actor generation and return its handle.
    pub fn start(config: CacheConfig, store: Arc<dyn BackingStore>) -> Self {
        let inbox = CacheActor::spawn(config.clone(), Arc::clone(&store));
        Self {
            inner: Arc::new(Inner {
                inbox: RwLock::new(inbox),
                config,
                store,
            }),
        }
    }

    /// Configuration shared by every generation of this handle
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    fn sender(&self) -> mpsc::Sender<CacheMessage> {
        self.inner.inbox.read().clone()
    }

    /// Fetch a file through the cache, blocking the calling task until the
    /// actor or a read coordinator answers. No timeout of its own; the only
    /// deadline is the coordinator's.
    pub async fn get_file(&self, filename: &str) -> Result<Bytes> {
        let (reply, rx) = oneshot::channel();
        self.sender()
            .send(CacheMessage::Read {
                filename: filename.to_string(),
                reply,
            })
            .await
            .map_err(|_| Error::CacheClosed)?;
        let response = rx.await.map_err(|_| Error::CacheClosed)?;
        response.result
    }

    /// Snapshot of entry count, bytes used, and capacity
    pub async fn status(&self) -> Result<StatusSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.sender()
            .send(CacheMessage::Status { reply })
            .await
            .map_err(|_| Error::CacheClosed)?;
        rx.await.map_err(|_| Error::CacheClosed)
    }

    /// Tear down the current generation and start a fresh, empty one.
    ///
    /// The old generation is fully drained (Close acked) before the new one
    /// is spawned, so no two generations ever own cache state at once.
    pub async fn clear(&self) -> Result<()> {
        let (done, done_rx) = oneshot::channel();
        self.sender()
            .send(CacheMessage::Close { done })
            .await
            .map_err(|_| Error::CacheClosed)?;
        done_rx.await.map_err(|_| Error::CacheClosed)?;

        let fresh = CacheActor::spawn(self.inner.config.clone(), Arc::clone(&self.inner.store));
        *self.inner.inbox.write() = fresh;
        info!("cache cleared, fresh actor generation started");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
