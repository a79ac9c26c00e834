//! Cache Actor - Serialized Owner of Cache State
//!
//! A single tokio task owns the [`CacheTable`] and processes one message at
//! a time from its inbox. Helper work (the disk reads) happens off this
//! loop; only the admission decision re-enters it as a message, so the table
//! needs no locking.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::message::{CacheMessage, FileResponse, ReadOutcome, StatusSnapshot};
use super::metrics;
use super::reader;
use super::table::{AdmitOutcome, CacheTable};
use crate::config::CacheConfig;
use crate::store::BackingStore;

/// Inbox depth for one actor generation
pub(crate) const INBOX_CAPACITY: usize = 256;

/// The serialized cache owner.
///
/// One generation runs per `spawn`; a clear terminates the generation and
/// the façade starts a fresh one.
pub struct CacheActor {
    table: CacheTable,
    config: CacheConfig,
    store: Arc<dyn BackingStore>,
    inbox: mpsc::Receiver<CacheMessage>,
    /// Clone handed to read coordinators so completed reads can re-enter
    /// the serialized path as Admit messages
    sender: mpsc::Sender<CacheMessage>,
}

impl CacheActor {
    /// Spawn a new actor generation and return its inbox sender.
    pub fn spawn(config: CacheConfig, store: Arc<dyn BackingStore>) -> mpsc::Sender<CacheMessage> {
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            table: CacheTable::new(config.capacity),
            config,
            store,
            inbox: rx,
            sender: tx.clone(),
        };
        tokio::spawn(actor.run());
        tx
    }

    async fn run(mut self) {
        debug!(capacity = self.table.capacity(), "cache actor started");

        while let Some(msg) = self.inbox.recv().await {
            match msg {
                CacheMessage::Read { filename, reply } => self.handle_read(filename, reply),
                CacheMessage::Admit(outcome) => self.handle_admit(outcome),
                CacheMessage::Status { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                CacheMessage::Close { done } => {
                    self.table.clear();
                    self.publish_gauges();
                    // Reject further sends before acking so the caller sees
                    // a fully terminated generation once the ack arrives
                    self.inbox.close();
                    info!("cache actor closed, table drained");
                    let _ = done.send(());
                    return;
                }
            }
        }

        debug!("cache actor inbox closed without Close");
    }

    fn handle_read(&mut self, filename: String, reply: tokio::sync::oneshot::Sender<FileResponse>) {
        if let Some(entry) = self.table.lookup(&filename) {
            metrics::CACHE_HITS.inc();
            trace!(filename = %filename, "cache hit");
            let _ = reply.send(FileResponse {
                filename,
                result: Ok(entry.data().clone()),
            });
            return;
        }

        metrics::CACHE_MISSES.inc();
        trace!(filename = %filename, "cache miss, delegating to read coordinator");
        reader::spawn(
            filename,
            reply,
            Arc::clone(&self.store),
            self.config.read_timeout,
            self.sender.clone(),
        );
    }

    fn handle_admit(&mut self, outcome: ReadOutcome) {
        let ReadOutcome { filename, data } = outcome;

        // Failed reads are never cached
        let Some(data) = data else {
            trace!(filename = %filename, "failed read not admitted");
            return;
        };

        let entry = super::entry::CacheEntry::new(filename, data);
        match self.table.admit(entry) {
            AdmitOutcome::Inserted { evicted } => {
                metrics::CACHE_ADMISSIONS.inc();
                if evicted > 0 {
                    metrics::CACHE_EVICTIONS.inc_by(evicted as u64);
                }
                debug!(
                    evicted,
                    used_bytes = self.table.used_bytes(),
                    "entry admitted"
                );
            }
            AdmitOutcome::AlreadyPresent => {
                trace!("duplicate admission dropped, first writer won");
            }
            AdmitOutcome::TooLarge => {
                debug!(capacity = self.table.capacity(), "entry exceeds capacity, not cached");
            }
        }
        self.publish_gauges();
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            entries: self.table.len(),
            used_bytes: self.table.used_bytes(),
            capacity: self.table.capacity(),
        }
    }

    fn publish_gauges(&self) {
        metrics::CACHE_USED_BYTES.set(self.table.used_bytes() as i64);
        metrics::CACHE_ENTRIES.set(self.table.len() as i64);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::InMemoryBackingStore;
    use assert_matches::assert_matches;
    use bytes::Bytes;
    use tokio::sync::oneshot;

    fn test_config(capacity: u64) -> CacheConfig {
        CacheConfig {
            capacity,
            read_timeout: std::time::Duration::from_secs(5),
            ..Default::default()
        }
    }

    async fn read(
        tx: &mpsc::Sender<CacheMessage>,
        filename: &str,
    ) -> FileResponse {
        let (reply, rx) = oneshot::channel();
        tx.send(CacheMessage::Read {
            filename: filename.to_string(),
            reply,
        })
        .await
        .unwrap();
        rx.await.unwrap()
    }

    async fn status(tx: &mpsc::Sender<CacheMessage>) -> StatusSnapshot {
        let (reply, rx) = oneshot::channel();
        tx.send(CacheMessage::Status { reply }).await.unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let store = Arc::new(InMemoryBackingStore::new());
        store.insert("./a.txt", Bytes::from_static(b"alpha"));
        let tx = CacheActor::spawn(test_config(1000), store.clone());

        let response = read(&tx, "./a.txt").await;
        assert_eq!(response.result.unwrap().as_ref(), b"alpha");
        assert_eq!(store.reads(), 1);

        // Admission raced our next read; wait for the table to hold it
        let mut snapshot = status(&tx).await;
        while snapshot.entries == 0 {
            tokio::task::yield_now().await;
            snapshot = status(&tx).await;
        }
        assert_eq!(snapshot.used_bytes, 5);

        // Hit: no further backing-store read
        let response = read(&tx, "./a.txt").await;
        assert_eq!(response.result.unwrap().as_ref(), b"alpha");
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_not_cached() {
        let store = Arc::new(InMemoryBackingStore::new());
        let tx = CacheActor::spawn(test_config(1000), store.clone());

        let response = read(&tx, "./missing.txt").await;
        assert_matches!(response.result, Err(Error::ReadFailed { .. }));

        // A second request re-reads the store
        let response = read(&tx, "./missing.txt").await;
        assert_matches!(response.result, Err(Error::ReadFailed { .. }));
        assert_eq!(store.reads(), 2);

        let snapshot = status(&tx).await;
        assert_eq!(snapshot.entries, 0);
        assert_eq!(snapshot.used_bytes, 0);
    }

    #[tokio::test]
    async fn test_oversize_served_but_not_cached() {
        let store = Arc::new(InMemoryBackingStore::new());
        store.insert("./big.bin", Bytes::from(vec![7u8; 64]));
        let tx = CacheActor::spawn(test_config(10), store.clone());

        // Data is served normally even though it can never be cached
        let response = read(&tx, "./big.bin").await;
        assert_eq!(response.result.unwrap().len(), 64);

        let snapshot = status(&tx).await;
        assert_eq!(snapshot.entries, 0);

        let response = read(&tx, "./big.bin").await;
        assert_eq!(response.result.unwrap().len(), 64);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn test_first_writer_wins_on_admit() {
        let store = Arc::new(InMemoryBackingStore::new());
        let tx = CacheActor::spawn(test_config(1000), store);

        tx.send(CacheMessage::Admit(ReadOutcome {
            filename: "./a.txt".to_string(),
            data: Some(Bytes::from_static(b"first")),
        }))
        .await
        .unwrap();
        tx.send(CacheMessage::Admit(ReadOutcome {
            filename: "./a.txt".to_string(),
            data: Some(Bytes::from_static(b"second, longer")),
        }))
        .await
        .unwrap();

        let snapshot = status(&tx).await;
        assert_eq!(snapshot.entries, 1);
        assert_eq!(snapshot.used_bytes, 5);

        let response = read(&tx, "./a.txt").await;
        assert_eq!(response.result.unwrap().as_ref(), b"first");
    }

    #[tokio::test]
    async fn test_eviction_on_pressure() {
        let store = Arc::new(InMemoryBackingStore::new());
        let tx = CacheActor::spawn(test_config(100), store);

        tx.send(CacheMessage::Admit(ReadOutcome {
            filename: "./a.bin".to_string(),
            data: Some(Bytes::from(vec![0u8; 60])),
        }))
        .await
        .unwrap();
        tx.send(CacheMessage::Admit(ReadOutcome {
            filename: "./b.bin".to_string(),
            data: Some(Bytes::from(vec![0u8; 60])),
        }))
        .await
        .unwrap();

        let snapshot = status(&tx).await;
        assert_eq!(snapshot.entries, 1);
        assert_eq!(snapshot.used_bytes, 60);

        let response = read(&tx, "./b.bin").await;
        assert_eq!(response.result.unwrap().len(), 60);
    }

    #[tokio::test]
    async fn test_close_drains_and_terminates() {
        let store = Arc::new(InMemoryBackingStore::new());
        let tx = CacheActor::spawn(test_config(1000), store);

        tx.send(CacheMessage::Admit(ReadOutcome {
            filename: "./a.txt".to_string(),
            data: Some(Bytes::from_static(b"data")),
        }))
        .await
        .unwrap();

        let (done, done_rx) = oneshot::channel();
        tx.send(CacheMessage::Close { done }).await.unwrap();
        done_rx.await.unwrap();

        // The generation is gone; its inbox no longer accepts traffic
        let (reply, _rx) = oneshot::channel();
        let send = tx
            .send(CacheMessage::Read {
                filename: "./a.txt".to_string(),
                reply,
            })
            .await;
        assert!(send.is_err());
    }
}
