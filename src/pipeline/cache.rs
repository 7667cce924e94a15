//! Render Pipeline Cache
//!
//! Central owner of all constructed pipeline objects. Every draw request
//! builds a [`RenderPipelineKey`] from bound state and asks the cache for the
//! matching pipeline; the cache constructs it at most once per distinct key
//! and hands back a reference.
//!
//! # Generational eviction
//!
//! Instead of timestamps or an intrusive LRU list, each entry carries the
//! value of a global generation counter from the last lookup that returned
//! it. [`gc`] bumps the counter and sweeps the map once; entries whose stamp
//! lags by more than the configured age are evicted and their pipeline is
//! released through the backend. This is O(1) per access and O(n) per sweep,
//! and an entry used since the previous `gc` call is never reclaimed.
//!
//! # Failure sentinel
//!
//! A key whose construction fails is cached as an *invalid* entry: lookups
//! return `None` without retrying, and the frame that requested it decides
//! how to degrade (skip the draw, use a fallback pipeline).
//!
//! [`gc`]: PipelineCache::gc

use rustc_hash::FxHashMap;

use crate::config::DEFAULT_PIPELINE_MAX_AGE;
use crate::pipeline::backend::PipelineBackend;
use crate::pipeline::key::RenderPipelineKey;

struct CacheEntry<P> {
    /// `None` marks a key whose construction failed.
    pipeline: Option<P>,
    last_used_generation: u64,
}

/// Keyed pipeline cache with generational garbage collection.
///
/// Single-threaded by design: `get_or_create` mutates the map and `gc` both
/// reads and mutates generation stamps, so a multi-threaded submission model
/// must wrap the cache in one exclusive lock per instance.
pub struct PipelineCache<B: PipelineBackend> {
    entries: FxHashMap<RenderPipelineKey, CacheEntry<B::Pipeline>>,
    generation: u64,
    max_age: u64,
}

impl<B: PipelineBackend> Default for PipelineCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: PipelineBackend> PipelineCache<B> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_age(DEFAULT_PIPELINE_MAX_AGE)
    }

    /// A cache whose entries survive `max_age` generations without use.
    #[must_use]
    pub fn with_max_age(max_age: u64) -> Self {
        Self {
            entries: FxHashMap::default(),
            generation: 0,
            max_age,
        }
    }

    /// Look up or construct the pipeline for `key`.
    ///
    /// On a hit the entry's generation stamp is refreshed. On a miss the
    /// backend constructs the pipeline synchronously; a construction failure
    /// is logged and cached as an invalid entry, so the failing key is
    /// attempted exactly once per cache lifetime.
    ///
    /// Returns `None` only for such invalid entries.
    pub fn get_or_create(&mut self, backend: &mut B, key: &RenderPipelineKey) -> Option<&B::Pipeline> {
        debug_assert!(
            key.is_valid(),
            "pipeline key needs a vertex shader and a layout, within engine limits"
        );

        if !self.entries.contains_key(key) {
            let pipeline = match backend.create_render_pipeline(key) {
                Ok(pipeline) => Some(pipeline),
                Err(e) => {
                    log::error!("failed to create render pipeline: {e}");
                    None
                }
            };
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    pipeline,
                    last_used_generation: self.generation,
                },
            );
        }

        // Fresh entries are stamped with the current generation as well, so a
        // pipeline cannot be evicted by sweeps immediately after insertion.
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used_generation = self.generation;
                entry.pipeline.as_ref()
            }
            None => None,
        }
    }

    /// Advance the generation counter and evict every entry not used within
    /// the configured age, releasing its pipeline through the backend.
    ///
    /// Safe to call once per logical frame; with `max_age >= 1` an entry
    /// looked up since the previous `gc` call is never evicted.
    pub fn gc(&mut self, backend: &mut B) {
        self.generation += 1;
        let generation = self.generation;
        let max_age = self.max_age;
        self.entries.retain(|_, entry| {
            if generation > entry.last_used_generation + max_age {
                if let Some(pipeline) = entry.pipeline.take() {
                    backend.destroy_render_pipeline(pipeline);
                }
                false
            } else {
                true
            }
        });
    }

    /// Drop every entry and release all owned pipelines.
    ///
    /// Called on teardown or when device-wide settings invalidate all cached
    /// state at once.
    pub fn clear(&mut self, backend: &mut B) {
        for (_, mut entry) in self.entries.drain() {
            if let Some(pipeline) = entry.pipeline.take() {
                backend.destroy_render_pipeline(pipeline);
            }
        }
    }

    /// Number of cached entries, including invalid sentinels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of the global generation counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The configured eviction age threshold, in generations.
    #[must_use]
    pub fn max_age(&self) -> u64 {
        self.max_age
    }
}
