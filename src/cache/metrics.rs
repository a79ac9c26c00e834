//! Cache Metrics
//!
//! Prometheus counters and gauges for monitoring cache health, exposed by
//! the HTTP surface on `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_gauge, IntCounter, IntGauge,
};

/// Requests answered from the cache table
pub static CACHE_HITS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("coucheserve_cache_hits_total", "Requests answered from the cache")
        .expect("register cache_hits metric")
});

/// Requests that had to go to the backing store
pub static CACHE_MISSES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "coucheserve_cache_misses_total",
        "Requests that missed the cache"
    )
    .expect("register cache_misses metric")
});

/// Entries admitted into the cache
pub static CACHE_ADMISSIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "coucheserve_cache_admissions_total",
        "Entries admitted into the cache"
    )
    .expect("register cache_admissions metric")
});

/// Entries evicted to make room
pub static CACHE_EVICTIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "coucheserve_cache_evictions_total",
        "Entries evicted to make room"
    )
    .expect("register cache_evictions metric")
});

/// Reads that exceeded the configured deadline
pub static READ_TIMEOUTS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "coucheserve_read_timeouts_total",
        "Backing-store reads that exceeded the deadline"
    )
    .expect("register read_timeouts metric")
});

/// Bytes currently held by the cache
pub static CACHE_USED_BYTES: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("coucheserve_cache_used_bytes", "Bytes currently held by the cache")
        .expect("register cache_used_bytes metric")
});

/// Entries currently held by the cache
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "coucheserve_cache_entries",
        "Entries currently held by the cache"
    )
    .expect("register cache_entries metric")
});

// =============================================================================
// Tests
// =============================================================================
