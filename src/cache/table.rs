//! Cache Table - Capacity-Bounded Entry Map
//!
//! Owned exclusively by the cache actor; all mutation happens on the actor's
//! event loop, so no interior locking is needed here.
//!
//! # Eviction
//!
//! Admission under pressure evicts existing entries one at a time in map
//! iteration order until the new entry fits. `HashMap` iteration order is
//! unspecified, making this a policy-free first-fit: which victims are
//! chosen is arbitrary from the caller's perspective. No recency or
//! frequency is tracked.

use std::collections::HashMap;

use super::entry::CacheEntry;

/// Outcome of offering an entry for admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// Entry inserted, with the number of entries evicted to make room
    Inserted { evicted: usize },
    /// Filename already cached; first-writer-wins, offer dropped
    AlreadyPresent,
    /// Entry alone exceeds total capacity; never admitted
    TooLarge,
}

/// Mapping from filename to entry plus running byte total.
///
/// Invariants between state transitions:
/// - `used_bytes` equals the sum of entry sizes
/// - `used_bytes <= capacity`
#[derive(Debug)]
pub struct CacheTable {
    /// Cached entries keyed by normalized filename
    entries: HashMap<String, CacheEntry>,
    /// Bytes currently held
    used_bytes: u64,
    /// Maximum bytes the table may hold
    capacity: u64,
}

impl CacheTable {
    /// Create an empty table with the given byte capacity
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: HashMap::new(),
            used_bytes: 0,
            capacity,
        }
    }

    /// Look up an entry by filename
    pub fn lookup(&self, filename: &str) -> Option<&CacheEntry> {
        self.entries.get(filename)
    }

    /// Whether the filename is cached
    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently held
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Configured capacity in bytes
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Offer an entry for admission.
    ///
    /// First-writer-wins: a duplicate filename is a no-op. An entry larger
    /// than total capacity is never admitted. Otherwise entries are evicted
    /// in iteration order until the newcomer fits; eviction stops at the
    /// first step where enough space is free.
    pub fn admit(&mut self, entry: CacheEntry) -> AdmitOutcome {
        if self.entries.contains_key(entry.filename()) {
            return AdmitOutcome::AlreadyPresent;
        }

        let size = entry.size();
        if size > self.capacity {
            return AdmitOutcome::TooLarge;
        }

        let mut evicted = 0;
        while self.capacity - self.used_bytes < size {
            // Safe: size <= capacity, so an eviction candidate must exist
            let victim = match self.entries.keys().next() {
                Some(k) => k.clone(),
                None => break,
            };
            if let Some(old) = self.entries.remove(&victim) {
                self.used_bytes -= old.size();
                evicted += 1;
            }
        }

        self.used_bytes += size;
        self.entries.insert(entry.filename().to_string(), entry);
        AdmitOutcome::Inserted { evicted }
    }

    /// Drop every entry and reset the byte total
    pub fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }

    /// Recompute the byte total from scratch (test support)
    #[cfg(test)]
    fn checked_used_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.size()).sum()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn entry(name: &str, size: usize) -> CacheEntry {
        CacheEntry::new(name, Bytes::from(vec![0u8; size]))
    }

    #[test]
    fn test_empty_table() {
        let table = CacheTable::new(100);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.used_bytes(), 0);
        assert_eq!(table.capacity(), 100);
    }

    #[test]
    fn test_direct_admission() {
        let mut table = CacheTable::new(100);

        let outcome = table.admit(entry("./a.txt", 40));
        assert_eq!(outcome, AdmitOutcome::Inserted { evicted: 0 });
        assert_eq!(table.used_bytes(), 40);
        assert!(table.contains("./a.txt"));
    }

    #[test]
    fn test_lookup_returns_stored_bytes() {
        let mut table = CacheTable::new(100);
        let data = Bytes::from_static(b"content");
        table.admit(CacheEntry::new("./a.txt", data.clone()));

        let found = table.lookup("./a.txt").unwrap();
        assert_eq!(found.data(), &data);
        assert!(table.lookup("./b.txt").is_none());
    }

    #[test]
    fn test_first_writer_wins() {
        let mut table = CacheTable::new(100);
        table.admit(CacheEntry::new("./a.txt", Bytes::from_static(b"first")));

        let outcome = table.admit(CacheEntry::new("./a.txt", Bytes::from_static(b"second!!")));
        assert_eq!(outcome, AdmitOutcome::AlreadyPresent);
        assert_eq!(table.used_bytes(), 5);
        assert_eq!(table.lookup("./a.txt").unwrap().data().as_ref(), b"first");
    }

    #[test]
    fn test_oversize_rejection() {
        let mut table = CacheTable::new(100);

        let outcome = table.admit(entry("./big.bin", 101));
        assert_eq!(outcome, AdmitOutcome::TooLarge);
        assert!(table.is_empty());
        assert_eq!(table.used_bytes(), 0);
    }

    #[test]
    fn test_exact_capacity_admitted() {
        let mut table = CacheTable::new(100);

        let outcome = table.admit(entry("./full.bin", 100));
        assert_eq!(outcome, AdmitOutcome::Inserted { evicted: 0 });
        assert_eq!(table.used_bytes(), 100);
    }

    #[test]
    fn test_eviction_makes_room() {
        // capacity 100, A(60) then B(60): direct space 40 < 60, so A is
        // evicted and B admitted; final state {B} with 60 bytes used.
        let mut table = CacheTable::new(100);
        table.admit(entry("./a.bin", 60));

        let outcome = table.admit(entry("./b.bin", 60));
        assert_eq!(outcome, AdmitOutcome::Inserted { evicted: 1 });
        assert_eq!(table.len(), 1);
        assert!(table.contains("./b.bin"));
        assert!(!table.contains("./a.bin"));
        assert_eq!(table.used_bytes(), 60);
    }

    #[test]
    fn test_eviction_stops_when_space_frees() {
        // Three 30-byte entries at capacity 100; admitting 40 bytes needs
        // exactly one eviction (100 - 90 = 10 < 40; after one, 100 - 60 = 40).
        let mut table = CacheTable::new(100);
        table.admit(entry("./a.bin", 30));
        table.admit(entry("./b.bin", 30));
        table.admit(entry("./c.bin", 30));

        let outcome = table.admit(entry("./d.bin", 40));
        assert_eq!(outcome, AdmitOutcome::Inserted { evicted: 1 });
        assert_eq!(table.len(), 3);
        assert_eq!(table.used_bytes(), 100);
        assert!(table.contains("./d.bin"));
    }

    #[test]
    fn test_eviction_may_empty_table() {
        let mut table = CacheTable::new(100);
        table.admit(entry("./a.bin", 50));
        table.admit(entry("./b.bin", 50));

        let outcome = table.admit(entry("./c.bin", 100));
        assert_eq!(outcome, AdmitOutcome::Inserted { evicted: 2 });
        assert_eq!(table.len(), 1);
        assert_eq!(table.used_bytes(), 100);
    }

    #[test]
    fn test_clear() {
        let mut table = CacheTable::new(100);
        table.admit(entry("./a.bin", 30));
        table.admit(entry("./b.bin", 30));

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.used_bytes(), 0);

        // Clearing an already-empty table is a no-op
        table.clear();
        assert_eq!(table.used_bytes(), 0);
    }

    #[test]
    fn test_zero_capacity_admits_nothing() {
        let mut table = CacheTable::new(0);

        assert_eq!(table.admit(entry("./a.bin", 1)), AdmitOutcome::TooLarge);
        // A zero-byte entry fits a zero-byte capacity
        assert_eq!(
            table.admit(entry("./empty.bin", 0)),
            AdmitOutcome::Inserted { evicted: 0 }
        );
        assert_eq!(table.used_bytes(), 0);
    }

    #[test]
    fn test_used_bytes_matches_entry_sum() {
        let mut table = CacheTable::new(200);
        table.admit(entry("./a.bin", 80));
        table.admit(entry("./b.bin", 80));
        table.admit(entry("./c.bin", 80)); // forces eviction

        assert_eq!(table.used_bytes(), table.checked_used_bytes());
        assert!(table.used_bytes() <= table.capacity());
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use bytes::Bytes;
    use proptest::prelude::*;

    /// Strategy for admission sequences: small name space so duplicates and
    /// evictions both occur, sizes straddling the capacity used below.
    fn admission_strategy() -> impl Strategy<Value = Vec<(u8, usize)>> {
        prop::collection::vec((0u8..16, 0usize..160), 1..64)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_capacity_invariant_holds(ops in admission_strategy()) {
            let capacity = 100u64;
            let mut table = CacheTable::new(capacity);

            for (name, size) in ops {
                let filename = format!("./file-{name}.bin");
                table.admit(CacheEntry::new(filename, Bytes::from(vec![0u8; size])));

                // used_bytes tracks the entry sum and never exceeds capacity
                let sum: u64 = {
                    let mut total = 0u64;
                    for i in 0u8..16 {
                        if let Some(e) = table.lookup(&format!("./file-{i}.bin")) {
                            total += e.size();
                        }
                    }
                    total
                };
                prop_assert_eq!(table.used_bytes(), sum);
                prop_assert!(table.used_bytes() <= capacity);
            }
        }

        #[test]
        fn prop_stored_entries_fit_capacity(ops in admission_strategy()) {
            let capacity = 100u64;
            let mut table = CacheTable::new(capacity);

            for (name, size) in ops {
                let filename = format!("./file-{name}.bin");
                let outcome =
                    table.admit(CacheEntry::new(filename, Bytes::from(vec![0u8; size])));

                // An oversize offer is never inserted
                if size as u64 > capacity {
                    let was_inserted = matches!(outcome, AdmitOutcome::Inserted { .. });
                    prop_assert!(!was_inserted);
                }
                // No stored entry ever exceeds total capacity
                for i in 0u8..16 {
                    if let Some(e) = table.lookup(&format!("./file-{i}.bin")) {
                        prop_assert!(e.size() <= capacity);
                    }
                }
            }
        }
    }
}
