//! # Generation Cache
//!
//! Caches generated solids for repeated command inputs.
//!
//! ## Features
//!
//! - **Content-based keys**: exact input parameters, floats by bit pattern
//! - **LRU eviction**: least recently used entry goes first when full
//! - **Statistics**: hit/miss counts for tuning
//!
//! ## Example
//!
//! ```rust
//! use qr_host::cache::{CacheKey, GenerationCache};
//! use qr_host::commands::QrCodeInputs;
//!
//! let mut cache = GenerationCache::new(8);
//! let key = CacheKey::qr(&QrCodeInputs::default());
//! assert!(cache.get(&key).is_none());
//! assert_eq!(cache.stats().misses, 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use config::constants::DEFAULT_CACHE_ENTRIES;
use qr_solid::{ModuleMatrix, QrOptions};
use solid_mesh::RectSolid;
use tracing::debug;

use crate::commands::QrCodeInputs;

/// Cache key for solid lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(pub String);

impl CacheKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Key for a QR code command run.
    ///
    /// Every input that changes the solid is part of the key. Two sizes
    /// differing only in the last bit give different keys. The text goes
    /// last, prefixed with its byte length.
    pub fn qr(inputs: &QrCodeInputs) -> Self {
        Self(format!(
            "qr:ec={:?}:v={}:{}:t={}:{}",
            inputs.error_correction,
            inputs.min_version,
            options_key(&inputs.options()),
            inputs.text.len(),
            inputs.text,
        ))
    }

    /// Key for a matrix compiled directly.
    pub fn matrix(matrix: &ModuleMatrix, options: &QrOptions) -> Self {
        Self(format!(
            "matrix:n={}:{}:{}",
            matrix.size(),
            options_key(options),
            matrix,
        ))
    }
}

fn options_key(options: &QrOptions) -> String {
    format!(
        "s={:x}:th={:x}:b={}:m={:x}:bt={:x}",
        options.size.to_bits(),
        options.thickness.to_bits(),
        options.create_base,
        options.margin.to_bits(),
        options.base_thickness.to_bits(),
    )
}

#[derive(Debug, Clone)]
struct CacheEntry {
    solid: Arc<RectSolid>,
    /// Last access tick
    access_count: u64,
}

/// Solid cache with LRU eviction.
#[derive(Debug)]
pub struct GenerationCache {
    entries: HashMap<CacheKey, CacheEntry>,
    max_entries: usize,
    total_accesses: u64,
    stats: CacheStats,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_stored: u64,
}

impl CacheStats {
    /// Hit rate in `[0, 1]`, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl GenerationCache {
    /// Creates a cache holding at most `max_entries` solids (at least one).
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: HashMap::with_capacity(max_entries),
            max_entries,
            total_accesses: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<RectSolid>> {
        self.total_accesses += 1;

        if let Some(entry) = self.entries.get_mut(key) {
            entry.access_count = self.total_accesses;
            self.stats.hits += 1;
            debug!(key = %key.0, "generation cache hit");
            Some(Arc::clone(&entry.solid))
        } else {
            self.stats.misses += 1;
            debug!(key = %key.0, "generation cache miss");
            None
        }
    }

    pub fn put(&mut self, key: CacheKey, solid: RectSolid) -> Arc<RectSolid> {
        let solid = Arc::new(solid);
        self.put_arc(key, Arc::clone(&solid));
        solid
    }

    pub fn put_arc(&mut self, key: CacheKey, solid: Arc<RectSolid>) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                self.evict_lru();
            }
        }

        self.total_accesses += 1;
        self.entries.insert(
            key,
            CacheEntry {
                solid,
                access_count: self.total_accesses,
            },
        );
        self.stats.total_stored += 1;
    }

    fn evict_lru(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.access_count)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}
