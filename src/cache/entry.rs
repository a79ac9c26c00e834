//! Cache Entry Types

use bytes::Bytes;

/// One cached file's content.
///
/// Entries are immutable once created; a changed file is replaced wholesale,
/// never mutated in place.
#[derive(Clone)]
pub struct CacheEntry {
    /// Normalized relative path, unique key
    filename: String,
    /// Full file content (zero-copy via Bytes)
    data: Bytes,
}

impl CacheEntry {
    /// Create a new cache entry
    pub fn new(filename: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    /// Filename this entry is keyed by
    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// File content (zero-copy)
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Content size in bytes
    #[inline]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("filename", &self.filename)
            .field("size", &self.size())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
