//! Cache metrics for observability

use prometheus::{IntCounterVec, Opts, Registry};
use tracing::trace;

/// Point-in-time counter values for one entity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub fetch_errors: u64,
}

/// Hit/miss counters labelled by entity, registered on a registry owned by
/// the cache; clones share the same counters
#[derive(Clone)]
pub struct CacheStats {
    registry: Registry,
    hits: IntCounterVec,
    misses: IntCounterVec,
    writes: IntCounterVec,
    fetch_errors: IntCounterVec,
}

fn counter(name: &str, help: &str) -> IntCounterVec {
    IntCounterVec::new(Opts::new(name, help), &["entity"]).expect("valid metric definition")
}

impl CacheStats {
    pub fn new() -> Self {
        let stats = Self {
            registry: Registry::new(),
            hits: counter("blogspace_cache_hits_total", "Total cache hits"),
            misses: counter("blogspace_cache_misses_total", "Total cache misses"),
            writes: counter("blogspace_cache_writes_total", "Total cache writes"),
            fetch_errors: counter(
                "blogspace_cache_fetch_errors_total",
                "Total failed cache fills",
            ),
        };
        for metric in [&stats.hits, &stats.misses, &stats.writes, &stats.fetch_errors] {
            stats
                .registry
                .register(Box::new(metric.clone()))
                .expect("metric registered once on a fresh registry");
        }
        stats
    }

    /// Registry holding the cache counters, for export
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_hit(&self, entity: &str) {
        self.hits.with_label_values(&[entity]).inc();
        trace!(entity, "cache hit recorded");
    }

    pub fn record_miss(&self, entity: &str) {
        self.misses.with_label_values(&[entity]).inc();
        trace!(entity, "cache miss recorded");
    }

    pub fn record_write(&self, entity: &str) {
        self.writes.with_label_values(&[entity]).inc();
        trace!(entity, "cache write recorded");
    }

    pub fn record_fetch_error(&self, entity: &str) {
        self.fetch_errors.with_label_values(&[entity]).inc();
        trace!(entity, "cache fetch error recorded");
    }

    pub fn snapshot(&self, entity: &str) -> CacheSnapshot {
        CacheSnapshot {
            hits: self.hits.with_label_values(&[entity]).get(),
            misses: self.misses.with_label_values(&[entity]).get(),
            writes: self.writes.with_label_values(&[entity]).get(),
            fetch_errors: self.fetch_errors.with_label_values(&[entity]).get(),
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}
