//! Per-city road-graph cache with an injected loading seam.
//!
//! Graph acquisition (file parsing, network download) is an external
//! concern; the cache only asks a [`GraphSource`] once per city and keeps
//! the answer — including a negative one — for the process lifetime.
//! Reads take a shared lock; the first request for an uncached city holds
//! the write lock across the load, so concurrent requests cannot build
//! the same graph twice.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::graph::RoadGraph;

/// Provide the road network for a city, if one exists.
///
/// Implementations are free to read files, query services, or synthesise
/// graphs for tests; `None` means "no network available", which callers
/// treat as a cue to fall back to great-circle distances.
pub trait GraphSource: Send + Sync {
    /// Load the graph for `city`. Called at most once per cache key.
    fn load(&self, city: &str) -> Option<RoadGraph>;
}

/// A source with no graphs; every city falls back to great-circle maths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGraphs;

impl GraphSource for NoGraphs {
    fn load(&self, _city: &str) -> Option<RoadGraph> {
        None
    }
}

/// Cache keys are trimmed and lowercased; further normalisation (e.g.
/// diacritic folding) is the source's concern.
fn cache_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Read-mostly cache of one road graph per city.
pub struct GraphCache<S> {
    source: S,
    graphs: RwLock<HashMap<String, Option<Arc<RoadGraph>>>>,
}

impl<S: GraphSource> GraphCache<S> {
    /// Wrap a source with an empty cache.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            graphs: RwLock::new(HashMap::new()),
        }
    }

    /// The graph for `city`, loading and caching it on first use.
    ///
    /// `None` is also cached, so an absent graph costs one load attempt
    /// per process, not one per query.
    #[must_use]
    pub fn graph_for(&self, city: &str) -> Option<Arc<RoadGraph>> {
        let key = cache_key(city);
        {
            let graphs = self
                .graphs
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = graphs.get(&key) {
                return entry.clone();
            }
        }
        let mut graphs = self
            .graphs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = graphs.get(&key) {
            return entry.clone();
        }
        let loaded = self.source.load(&key).map(Arc::new);
        if loaded.is_none() {
            log::debug!("no road graph for '{key}'; distances fall back to great-circle");
        }
        graphs.insert(key, loaded.clone());
        loaded
    }

    /// Whether a load attempt for `city` has already happened.
    #[must_use]
    pub fn is_cached(&self, city: &str) -> bool {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&cache_key(city))
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for GraphCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCache")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
