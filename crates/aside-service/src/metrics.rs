//! Prometheus metrics for the cache-aside read path.

use metrics::{counter, describe_counter};

/// Metric names for the accessor.
pub mod names {
    /// Reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "aside_cache_hits_total";
    /// Reads the cache could not answer.
    pub const CACHE_MISSES_TOTAL: &str = "aside_cache_misses_total";
    /// Cache calls that failed or timed out, labelled by operation.
    pub const CACHE_ERRORS_TOTAL: &str = "aside_cache_errors_total";
    /// Store lookups, labelled by outcome.
    pub const STORE_LOOKUPS_TOTAL: &str = "aside_store_lookups_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of reads answered from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of reads that fell through to the origin store"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of failed or timed out cache calls"
    );
    describe_counter!(
        names::STORE_LOOKUPS_TOTAL,
        "Total number of origin store lookups by outcome"
    );
}

/// Cache operation label values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    Get,
    Set,
}

impl CacheOperation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a read served from the cache.
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a read that has to go to the store.
    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a failed cache call.
    pub fn error(operation: CacheOperation) {
        counter!(
            names::CACHE_ERRORS_TOTAL,
            "operation" => operation.as_str()
        )
        .increment(1);
    }
}

/// Store metrics recorder.
#[derive(Clone)]
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a store lookup. `outcome` is one of `found`, `not_found`,
    /// `timeout` or `error`.
    pub fn lookup(outcome: &'static str) {
        counter!(
            names::STORE_LOOKUPS_TOTAL,
            "outcome" => outcome
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        // No recorder installed; registration must still be safe.
        register_metrics();
    }

    #[test]
    fn test_recorders() {
        CacheMetrics::hit();
        CacheMetrics::miss();
        CacheMetrics::error(CacheOperation::Get);
        CacheMetrics::error(CacheOperation::Set);
        StoreMetrics::lookup("found");
    }

    #[test]
    fn test_operation_labels() {
        assert_eq!(CacheOperation::Get.as_str(), "get");
        assert_eq!(CacheOperation::Set.as_str(), "set");
    }
}
