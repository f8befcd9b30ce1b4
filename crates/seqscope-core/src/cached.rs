//! Lazy value and factor cache with a block/doubling growth policy.
//!
//! [`Cached`] owns the bounds, the cache window and the two caches, and
//! delegates per-index work to a [`ValueHook`] and a [`FactorHook`] injected
//! at construction. `fill_cache` is the only caller of either hook and walks
//! indices strictly upward from `last_cached + 1`, so no index is ever
//! calculated or factored twice. Non-deterministic hooks rely on this.

use async_trait::async_trait;
use num_bigint::BigInt;
use tracing::debug;

use crate::factor::{global_factorizer, Factorization, SharedFactorizer};
use crate::options::CacheOptions;
use crate::sequence::{check_range, Index, Last, Sequence, SequenceError};

/// Per-index value computation.
pub trait ValueHook: Send {
    /// Produce the value at index `n`.
    fn calculate(&mut self, n: Index) -> Result<BigInt, SequenceError>;
}

/// Per-index factorization, given the value that was actually cached.
pub trait FactorHook: Send {
    fn factor(&mut self, n: Index, value: &BigInt) -> Factorization;
}

impl<T> ValueHook for T
where
    T: FnMut(Index) -> Result<BigInt, SequenceError> + Send,
{
    fn calculate(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        self(n)
    }
}

impl<T> FactorHook for T
where
    T: FnMut(Index, &BigInt) -> Factorization + Send,
{
    fn factor(&mut self, n: Index, value: &BigInt) -> Factorization {
        self(n, value)
    }
}

/// The value at index `n` is `n` itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexValues;

impl ValueHook for IndexValues {
    fn calculate(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        Ok(BigInt::from(n))
    }
}

/// Declines to factor anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFactors;

impl FactorHook for NoFactors {
    fn factor(&mut self, _n: Index, _value: &BigInt) -> Factorization {
        Factorization::Unknown
    }
}

/// Factors each value with a (by default process-wide) trial-division factorizer.
#[derive(Clone)]
pub struct TrialDivision {
    factorizer: SharedFactorizer,
}

impl TrialDivision {
    #[must_use]
    pub fn new() -> Self {
        Self::with_factorizer(global_factorizer())
    }

    #[must_use]
    pub fn with_factorizer(factorizer: SharedFactorizer) -> Self {
        Self { factorizer }
    }
}

impl Default for TrialDivision {
    fn default() -> Self {
        Self::new()
    }
}

impl FactorHook for TrialDivision {
    fn factor(&mut self, _n: Index, value: &BigInt) -> Factorization {
        self.factorizer.lock().factor(value)
    }
}

/// Materialized range of a cache.
///
/// `(first - 1, last_cached]` is fully populated. `caching_to` is the target
/// of the current fill; it equals `last_cached` when no fill is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheWindow {
    pub last_cached: Index,
    pub caching_to: Index,
}

impl CacheWindow {
    /// Whether a fill was started and never reached its target.
    #[must_use]
    pub fn is_filling(&self) -> bool {
        self.last_cached != self.caching_to
    }
}

/// Generic caching sequence engine.
pub struct Cached<V, F = NoFactors> {
    name: String,
    description: String,
    first: Index,
    last: Last,
    cache_block: u64,
    values: V,
    factors: F,
    value_cache: Vec<BigInt>,
    factor_cache: Vec<Factorization>,
    window: CacheWindow,
    ready: bool,
}

impl<V: ValueHook, F: FactorHook> Cached<V, F> {
    /// Create an uninitialized engine.
    #[must_use]
    pub fn new(values: V, factors: F, opts: CacheOptions) -> Self {
        let opts = opts.normalize();
        let start = opts.first.saturating_sub(1);
        Self {
            name: String::from("An uninitialized generic sequence"),
            description: String::new(),
            first: opts.first,
            last: opts.last,
            cache_block: opts.cache_block,
            values,
            factors,
            value_cache: Vec::new(),
            factor_cache: Vec::new(),
            window: CacheWindow {
                last_cached: start,
                caching_to: start,
            },
            ready: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Current cache window.
    #[must_use]
    pub fn window(&self) -> CacheWindow {
        self.window
    }

    #[must_use]
    pub fn cache_block(&self) -> u64 {
        self.cache_block
    }

    /// The value hook.
    #[must_use]
    pub fn values(&self) -> &V {
        &self.values
    }

    /// Number of entries materialized so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.value_cache.len()
    }

    /// Perform the first fill of one cache block. Idempotent once it succeeds.
    pub fn initialize_sync(&mut self) -> Result<(), SequenceError> {
        if self.ready {
            return Ok(());
        }
        if self.first == Index::MIN {
            return Err(SequenceError::InvalidConfig(
                "first index must be greater than i64::MIN".into(),
            ));
        }
        if self.window.is_filling() {
            return Err(self.caching_error());
        }
        let last_cached = self.window.last_cached;
        self.window.caching_to = self
            .last
            .clamp(last_cached.saturating_add(self.block_len()))
            .max(last_cached);
        self.fill_cache()?;
        self.ready = true;
        Ok(())
    }

    /// Pick a new fill target able to hold index `n`.
    ///
    /// Grows by at least one block, doubles for far-ahead access, always
    /// covers `n`, and never passes `last`.
    pub fn resize_cache(&mut self, n: Index) {
        let last_cached = self.window.last_cached;
        let target = last_cached
            .saturating_add(self.block_len())
            .max(last_cached.saturating_mul(2))
            .max(n.saturating_add(1));
        self.window.caching_to = self.last.clamp(target).max(last_cached);
    }

    /// Compute every index in `(last_cached, caching_to]`, in order.
    pub fn fill_cache(&mut self) -> Result<(), SequenceError> {
        let from = self.window.last_cached;
        while self.window.last_cached < self.window.caching_to {
            let i = self.window.last_cached + 1;
            let value = self.values.calculate(i)?;
            let factors = self.factors.factor(i, &value);
            self.value_cache.push(value);
            self.factor_cache.push(factors);
            self.window.last_cached = i;
        }
        debug!(
            sequence = %self.name,
            from = from + 1,
            to = self.window.last_cached,
            "filled cache"
        );
        Ok(())
    }

    fn ensure_cached(&mut self, n: Index) -> Result<usize, SequenceError> {
        if !self.ready {
            return Err(SequenceError::NotInitialized);
        }
        check_range(n, self.first, self.last)?;
        if n > self.window.last_cached {
            if self.window.is_filling() {
                return Err(self.caching_error());
            }
            self.resize_cache(n);
            self.fill_cache()?;
        }
        self.slot(n)
    }

    fn slot(&self, n: Index) -> Result<usize, SequenceError> {
        usize::try_from(i128::from(n) - i128::from(self.first))
            .map_err(|_| SequenceError::Calculation(format!("index {n} has no cache slot")))
    }

    fn block_len(&self) -> Index {
        Index::try_from(self.cache_block).unwrap_or(Index::MAX)
    }

    fn caching_error(&self) -> SequenceError {
        SequenceError::CachingInProgress {
            last_cached: self.window.last_cached,
            caching_to: self.window.caching_to,
        }
    }
}

#[async_trait]
impl<V: ValueHook, F: FactorHook> Sequence for Cached<V, F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn first(&self) -> Index {
        self.first
    }

    fn last(&self) -> Last {
        self.last
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn initialize(&mut self) -> Result<(), SequenceError> {
        self.initialize_sync()
    }

    fn get_element(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        let slot = self.ensure_cached(n)?;
        Ok(self.value_cache[slot].clone())
    }

    fn get_factors(&mut self, n: Index) -> Result<Factorization, SequenceError> {
        let slot = self.ensure_cached(n)?;
        Ok(self.factor_cache[slot].clone())
    }
}
