//! Construction options for the caching engine.

use crate::constants::DEFAULT_CACHE_BLOCK;
use crate::sequence::{Index, Last};

/// Bounds and growth policy for a [`Cached`](crate::cached::Cached) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Smallest valid index.
    pub first: Index,
    /// Largest valid index.
    pub last: Last,
    /// Minimum number of entries materialized per growth event (0 = default).
    pub cache_block: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            first: 0,
            last: Last::Unbounded,
            cache_block: DEFAULT_CACHE_BLOCK,
        }
    }
}

impl CacheOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.cache_block == 0 {
            self.cache_block = DEFAULT_CACHE_BLOCK;
        }
        self
    }

    #[must_use]
    pub fn with_first(mut self, first: Index) -> Self {
        self.first = first;
        self
    }

    #[must_use]
    pub fn with_last(mut self, last: Last) -> Self {
        self.last = last;
        self
    }

    #[must_use]
    pub fn with_cache_block(mut self, cache_block: u64) -> Self {
        self.cache_block = cache_block;
        self
    }
}
