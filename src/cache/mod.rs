//! Actor-Owned File Cache
//!
//! A byte-capacity-bounded in-memory cache in front of a slow backing
//! store. All cache state lives inside a single serialized actor task;
//! everything else talks to it by message passing, so the table needs no
//! locks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ Request handlers                                                  │
//! │      │ get_file / status / clear                                  │
//! │      ▼                                                            │
//! │ ┌───────────┐   Read/Status/Close    ┌──────────────────────────┐ │
//! │ │CacheHandle│ ─────────────────────▶ │ CacheActor (one task)    │ │
//! │ │ (façade)  │ ◀──── oneshot reply ── │  owns CacheTable         │ │
//! │ └───────────┘                        └──────────┬───────────────┘ │
//! │                          miss: spawn │          │ Admit           │
//! │                                      ▼          │                 │
//! │                            ┌──────────────────┐ │                 │
//! │                            │ Read Coordinator │─┘                 │
//! │                            │ (timeout race)   │                   │
//! │                            └────────┬─────────┘                   │
//! │                                     ▼                             │
//! │                              BackingStore                         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency
//!
//! - Requests for the same filename are not coalesced; each miss runs its
//!   own read, and first-writer-wins settles the admission race.
//! - A timed-out read keeps running and still populates the cache when it
//!   eventually completes; the requester was answered exactly once at the
//!   deadline.
//! - A clear is a generation handoff: the old actor drains and terminates
//!   before a fresh one takes over the same configuration.

mod actor;
mod entry;
mod handle;
pub mod message;
pub mod metrics;
mod reader;
mod table;

pub use entry::CacheEntry;
pub use handle::CacheHandle;
pub use message::StatusSnapshot;
pub use table::{AdmitOutcome, CacheTable};
