//! CoucheServe Community Edition - Caching HTTP File Server
//!
//! A single-process file server that answers path requests from a backing
//! directory, shielded by an in-memory, byte-capacity-bounded cache. All
//! cache state is owned by one serialized actor task; slow disk reads run
//! off that loop, bounded by a timeout that still lets a late result
//! populate the cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         CoucheServe                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐       │
//! │  │ HTTP Surface │───▶│ Cache Handle │───▶│ Cache Actor  │       │
//! │  │  (hyper)     │    │  (façade)    │    │ (one task)   │       │
//! │  └──────────────┘    └──────────────┘    └──────┬───────┘       │
//! │                                                 │ miss          │
//! │                                        ┌────────▼─────────┐     │
//! │                                        │ Read Coordinator │     │
//! │                                        │ (timeout race)   │     │
//! │                                        └────────┬─────────┘     │
//! │                                        ┌────────▼─────────┐     │
//! │                                        │  Backing Store   │     │
//! │                                        └──────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`] - Actor-owned cache: table, actor loop, read coordinator, façade
//! - [`config`] - Process-wide configuration, set once at startup
//! - [`error`] - Error types
//! - [`server`] - HTTP surface: routing, path sanitization, metrics exposition
//! - [`store`] - Backing-store port with filesystem and in-memory adapters

pub mod cache;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use cache::{CacheHandle, StatusSnapshot};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use store::{BackingStore, FsBackingStore, InMemoryBackingStore};
