//! The sequence contract shared by every sequence variant.
//!
//! `Sequence` is the public trait consumed by front ends. Locally computed
//! sequences implement it through [`Cached`](crate::cached::Cached);
//! remotely populated ones implement it directly.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use num_bigint::BigInt;

use crate::factor::Factorization;

/// Sequence index type.
pub type Index = i64;

/// Upper bound of a sequence's valid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Last {
    Finite(Index),
    Unbounded,
}

impl Last {
    /// Whether `n` does not exceed this bound.
    #[must_use]
    pub fn admits(self, n: Index) -> bool {
        match self {
            Self::Finite(last) => n <= last,
            Self::Unbounded => true,
        }
    }

    /// The smaller of this bound and `n`.
    #[must_use]
    pub fn clamp(self, n: Index) -> Index {
        match self {
            Self::Finite(last) => n.min(last),
            Self::Unbounded => n,
        }
    }

    #[must_use]
    pub fn finite(self) -> Option<Index> {
        match self {
            Self::Finite(last) => Some(last),
            Self::Unbounded => None,
        }
    }
}

impl PartialOrd for Last {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Last {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.cmp(b),
            (Self::Finite(_), Self::Unbounded) => Ordering::Less,
            (Self::Unbounded, Self::Finite(_)) => Ordering::Greater,
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Last {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(last) => write!(f, "{last}"),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

/// Error type for sequence access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// Index outside `[first, last]`.
    #[error("index {index} not in {first}..{last}")]
    OutOfRange { index: Index, first: Index, last: Last },

    /// A fill was requested while an earlier one never completed.
    #[error("currently caching {last_cached} to {caching_to}")]
    CachingInProgress { last_cached: Index, caching_to: Index },

    /// Element access before a successful `initialize()`.
    #[error("sequence not initialized")]
    NotInitialized,

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A value hook failed.
    #[error("calculation error: {0}")]
    Calculation(String),
}

/// Fail with [`SequenceError::OutOfRange`] unless `first <= n <= last`.
pub fn check_range(n: Index, first: Index, last: Last) -> Result<(), SequenceError> {
    if n < first || !last.admits(n) {
        return Err(SequenceError::OutOfRange {
            index: n,
            first,
            last,
        });
    }
    Ok(())
}

/// Public capability set of every sequence.
#[async_trait]
pub trait Sequence: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str;

    /// First valid index.
    fn first(&self) -> Index;

    /// Last valid index, possibly unbounded.
    fn last(&self) -> Last;

    /// Whether `initialize()` has completed.
    fn is_ready(&self) -> bool;

    /// Prepare the sequence for element access. Idempotent.
    async fn initialize(&mut self) -> Result<(), SequenceError>;

    /// Value at index `n`.
    fn get_element(&mut self, n: Index) -> Result<BigInt, SequenceError>;

    /// Factorization of the value at index `n`.
    fn get_factors(&mut self, n: Index) -> Result<Factorization, SequenceError>;

    /// Number of valid indices, or `None` when unbounded.
    fn len(&self) -> Option<u64> {
        let last = self.last().finite()?;
        let span = i128::from(last) - i128::from(self.first()) + 1;
        Some(u64::try_from(span.max(0)).unwrap_or(u64::MAX))
    }

    /// A sequence with `first > last` has no usable entries.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}
