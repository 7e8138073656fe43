//! Structured logging and per-request metrics.
//!
//! - [`init_logging`] — one-time `tracing` setup with `RUST_LOG` support
//! - [`Metrics`] — counters collected while a request resolves relatives

use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "megagraph=info";

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over `default_filter`. Logs go to stderr so
/// JSON written to stdout by the CLI stays clean. Subsequent calls are
/// ignored.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Counters for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Edge-store queries issued (one per BFS layer).
    pub edge_queries: u64,
    /// Relative sets computed (one-hop or full closure).
    pub closures_computed: u64,
    /// Ancestor lookups answered from the parents cache.
    pub cache_hits: u64,
    /// Ancestor lookups that had to walk the graph.
    pub cache_misses: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "edge_queries": self.edge_queries,
            "closures_computed": self.closures_computed,
            "cache_hits": self.cache_hits,
            "cache_misses": self.cache_misses,
            "cache_hit_rate": self.cache_hit_rate(),
        })
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
