//! Read Coordinator - Timed Backing-Store Reads
//!
//! One coordinator task per cache miss. The backing-store read runs as its
//! own task feeding a oneshot completion channel; the coordinator races that
//! completion against the configured deadline.
//!
//! The requester gets exactly one reply, at read completion or at the
//! deadline, whichever is first. The read itself cannot be canceled: after a
//! timeout the coordinator keeps waiting and still offers the eventual
//! result for admission, so a slow read populates the cache for future
//! requests without a second reply to the already-answered requester.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::message::{CacheMessage, FileResponse, ReadOutcome};
use crate::error::{Error, Result};
use crate::store::BackingStore;

/// Spawn a coordinator for one missed filename.
///
/// `admit` is the inbox of the actor generation that observed the miss; if
/// that generation has terminated by the time the read completes, the
/// admission offer is dropped (see [`offer_admission`]).
pub(crate) fn spawn(
    filename: String,
    reply: oneshot::Sender<FileResponse>,
    store: Arc<dyn BackingStore>,
    read_timeout: Duration,
    admit: mpsc::Sender<CacheMessage>,
) {
    tokio::spawn(run(filename, reply, store, read_timeout, admit));
}

async fn run(
    filename: String,
    reply: oneshot::Sender<FileResponse>,
    store: Arc<dyn BackingStore>,
    read_timeout: Duration,
    admit: mpsc::Sender<CacheMessage>,
) {
    let (done_tx, mut done_rx) = oneshot::channel::<Result<Bytes>>();

    // The read runs to completion regardless of the deadline below
    {
        let store = Arc::clone(&store);
        let filename = filename.clone();
        tokio::spawn(async move {
            let result = store.read(&filename).await;
            let _ = done_tx.send(result);
        });
    }

    match tokio::time::timeout(read_timeout, &mut done_rx).await {
        Ok(Ok(result)) => {
            // Read finished within the deadline: admit, then answer
            offer_admission(&admit, &filename, &result).await;
            let _ = reply.send(FileResponse {
                filename,
                result,
            });
        }
        Ok(Err(_)) => {
            // Reader task died without reporting; nothing to admit
            warn!(filename = %filename, "backing-store read task dropped its result");
            let _ = reply.send(FileResponse {
                filename: filename.clone(),
                result: Err(Error::Internal(format!(
                    "backing-store read for '{filename}' produced no result"
                ))),
            });
        }
        Err(_) => {
            // Deadline first: answer now, keep waiting for the read
            super::metrics::READ_TIMEOUTS.inc();
            debug!(filename = %filename, ?read_timeout, "read timed out, requester answered");
            let _ = reply.send(FileResponse {
                filename: filename.clone(),
                result: Err(Error::ReadTimeout {
                    filename: filename.clone(),
                    timeout: read_timeout,
                }),
            });

            if let Ok(result) = done_rx.await {
                offer_admission(&admit, &filename, &result).await;
            }
        }
    }
}

/// Offer a completed read for admission, exactly once per completion.
///
/// The send fails when the target actor generation has already closed its
/// inbox (a clear raced this read); the outcome is dropped rather than
/// blocking the coordinator forever.
async fn offer_admission(
    admit: &mpsc::Sender<CacheMessage>,
    filename: &str,
    result: &Result<Bytes>,
) {
    let outcome = ReadOutcome {
        filename: filename.to_string(),
        data: result.as_ref().ok().cloned(),
    };
    if admit.send(CacheMessage::Admit(outcome)).await.is_err() {
        debug!(filename = %filename, "cache generation gone, dropping admission offer");
    }
}

// =============================================================================
// Tests
// =============================================================================
