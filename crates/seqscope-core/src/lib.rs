//! # seqscope-core
//!
//! Data-supply engine for browsing arbitrary-precision integer sequences.
//! Provides the sequence contract, the lazy caching engine that guarantees
//! each index is computed at most once, trial-division factorization, and
//! the locally computed sequence families.

pub mod cached;
pub mod constant;
pub mod constants;
pub mod factor;
pub mod formula;
pub mod naturals;
pub mod options;
pub mod random;
pub mod registry;
pub mod sequence;

// Re-exports
pub use cached::{Cached, CacheWindow, FactorHook, IndexValues, NoFactors, TrialDivision, ValueHook};
pub use constants::{exit_codes, DEFAULT_CACHE_BLOCK, MAX_SAFE_INTEGER};
pub use factor::{global_factorizer, simple_factor, Factor, Factorization, Factorizer, SharedFactorizer};
pub use options::CacheOptions;
pub use registry::{DefaultFactory, Params, RegisteredSequence, SequenceFactory};
pub use sequence::{check_range, Index, Last, Sequence, SequenceError};
