//! Request-scoped state.
//!
//! A [`RequestContext`] is created when a request starts and dropped (or
//! [`finish`](RequestContext::finish)ed) when it ends. Everything cached on
//! it, the ancestor closures in particular, lives exactly that long and is
//! never visible to another request.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::observability::Metrics;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// ParentsCache
// ---------------------------------------------------------------------------

/// Full transitive ancestor closures keyed by `(type, id)`.
#[derive(Debug, Default)]
pub struct ParentsCache {
    entries: HashMap<(String, i64), HashSet<i64>>,
}

impl ParentsCache {
    pub fn get(&self, kind: &str, id: i64) -> Option<&HashSet<i64>> {
        self.entries.get(&(kind.to_string(), id))
    }

    pub fn insert(&mut self, kind: &str, id: i64, parents: HashSet<i64>) {
        self.entries.insert((kind.to_string(), id), parents);
    }

    pub fn contains(&self, kind: &str, id: i64) -> bool {
        self.entries.contains_key(&(kind.to_string(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// Storage and counters owned by a single request.
pub struct RequestContext {
    id: u64,
    scoped: HashMap<TypeId, Box<dyn Any>>,
    metrics: Metrics,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("id", &self.id)
            .field("scoped_entries", &self.scoped.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// Start a new request with a process-unique id.
    pub fn new() -> Self {
        let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(request_id = id, "request started");
        Self {
            id,
            scoped: HashMap::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Return the request's instance of `T`, creating it on first access.
    pub fn get_or_create<T: Any + Default>(&mut self) -> &mut T {
        self.scoped
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()) as Box<dyn Any>)
            .downcast_mut::<T>()
            .expect("scoped storage is keyed by TypeId")
    }

    /// Return the request's instance of `T` if it has been created.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.scoped
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<T>())
    }

    /// The ancestor-closure cache for this request.
    pub fn parents_cache(&mut self) -> &mut ParentsCache {
        self.get_or_create::<ParentsCache>()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    /// End the request, discarding every cached entry.
    pub fn finish(self) -> Metrics {
        let cached = self.get::<ParentsCache>().map_or(0, ParentsCache::len);
        tracing::debug!(
            request_id = self.id,
            cached_closures = cached,
            edge_queries = self.metrics.edge_queries,
            cache_hits = self.metrics.cache_hits,
            cache_misses = self.metrics.cache_misses,
            "request finished"
        );
        self.metrics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
