//! Cache configuration
//!
//! Supplied once before the cache actor starts and read-only afterwards.
//! A cache clear restarts the actor with the same values.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default cache capacity in bytes
pub const DEFAULT_CAPACITY: u64 = 100_000;

/// Default per-read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Default directory the files are hosted in
pub const DEFAULT_ROOT_DIR: &str = "public_html/";

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of bytes the cache may hold
    pub capacity: u64,
    /// Deadline for a single backing-store read
    pub read_timeout: Duration,
    /// Directory the backing store serves files from
    pub root_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            read_timeout: DEFAULT_READ_TIMEOUT,
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
        }
    }
}

impl CacheConfig {
    /// Validate the configuration.
    ///
    /// A zero capacity is legal (nothing is ever admitted); an empty root
    /// directory is not.
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(Error::Config("root directory must not be empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
