//! Cache Actor Messages
//!
//! All cross-component state exchange is message passing; these are the
//! payloads. Reply channels are one-shot and consumed exactly once.

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::Result;

/// Messages accepted by the cache actor
#[derive(Debug)]
pub enum CacheMessage {
    /// File request with a private reply channel
    Read {
        filename: String,
        reply: oneshot::Sender<FileResponse>,
    },
    /// Completed backing-store read offered for admission.
    /// Sent only by read coordinators, success or failure.
    Admit(ReadOutcome),
    /// Snapshot query, pure read
    Status {
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Drain the table and terminate this actor generation.
    /// Acked on `done` once the table is empty and the loop is exiting.
    Close { done: oneshot::Sender<()> },
}

/// Reply delivered to a waiting requester
#[derive(Debug)]
pub struct FileResponse {
    /// Normalized filename the request was for
    pub filename: String,
    /// File bytes, or why they could not be produced
    pub result: Result<Bytes>,
}

/// The internal "disk read finished" signal.
///
/// `data` is `None` when the read failed; failures are never cached but are
/// still reported so the actor observes every completion.
#[derive(Debug)]
pub struct ReadOutcome {
    pub filename: String,
    pub data: Option<Bytes>,
}

/// Read-only snapshot of the cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Number of cached entries
    pub entries: usize,
    /// Bytes currently held
    pub used_bytes: u64,
    /// Configured capacity in bytes
    pub capacity: u64,
}

impl std::fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache status: {} entries, {} of {} bytes used",
            self.entries, self.used_bytes, self.capacity
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
