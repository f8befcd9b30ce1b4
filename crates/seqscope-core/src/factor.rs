//! Trial-division factorization with memoization.
//!
//! The factorizer divides out a table of small primes and certifies any
//! residual cofactor below [`CERTIFIED_PRIME_BOUND`] as prime. Residuals it
//! cannot certify make the whole result [`Factorization::Unknown`] rather than
//! a guess. Every certified prime found this way joins the prime table, and
//! every answer is memoized; neither table is ever evicted.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::constants::{CERTIFIED_PRIME_BOUND, MAX_SAFE_INTEGER, SMALL_PRIMES};

/// One `(base, exponent)` pair of a factorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factor {
    /// Prime base, or `-1` for the sign, or `0` for the value zero.
    pub base: BigInt,
    /// Multiplicity, always at least one.
    pub exponent: u32,
}

impl Factor {
    #[must_use]
    pub fn new(base: impl Into<BigInt>, exponent: u32) -> Self {
        Self {
            base: base.into(),
            exponent,
        }
    }
}

/// Prime decomposition of a sequence entry.
///
/// `Known(vec![])` is the factorization of `1`, `Known([(0, 1)])` that of
/// `0`, and a leading `(-1, 1)` carries the sign of a negative value.
/// `Unknown` means the value could not be factored with confidence; it is
/// a valid answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factorization {
    Known(Vec<Factor>),
    Unknown,
}

impl Factorization {
    /// The factorization of zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::Known(vec![Factor::new(0, 1)])
    }

    /// The factorization of one (no prime factors).
    #[must_use]
    pub fn one() -> Self {
        Self::Known(Vec::new())
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The factor pairs, if known.
    #[must_use]
    pub fn factors(&self) -> Option<&[Factor]> {
        match self {
            Self::Known(factors) => Some(factors),
            Self::Unknown => None,
        }
    }

    /// Multiply the pairs back together.
    ///
    /// Returns `None` for an unknown factorization.
    #[must_use]
    pub fn product(&self) -> Option<BigInt> {
        let factors = self.factors()?;
        Some(factors.iter().fold(BigInt::one(), |acc, f| {
            acc * Pow::pow(&f.base, f.exponent)
        }))
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factors = match self {
            Self::Unknown => return f.write_str("unknown"),
            Self::Known(factors) if factors.is_empty() => return f.write_str("1"),
            Self::Known(factors) => factors,
        };
        for (i, factor) in factors.iter().enumerate() {
            if i > 0 {
                f.write_str(" × ")?;
            }
            if factor.exponent == 1 {
                write!(f, "{}", factor.base)?;
            } else {
                write!(f, "{}^{}", factor.base, factor.exponent)?;
            }
        }
        Ok(())
    }
}

/// Memoizing trial-division factorizer with a growable prime table.
pub struct Factorizer {
    memo: HashMap<BigInt, Factorization>,
    /// Always sorted ascending.
    primes: Vec<u64>,
}

impl Factorizer {
    /// Create a factorizer seeded with the primes below 1000.
    #[must_use]
    pub fn new() -> Self {
        let mut memo = HashMap::new();
        memo.insert(BigInt::zero(), Factorization::zero());
        memo.insert(BigInt::one(), Factorization::one());
        memo.insert(-BigInt::one(), Factorization::Known(vec![Factor::new(-1, 1)]));
        Self {
            memo,
            primes: SMALL_PRIMES.iter().map(|&p| u64::from(p)).collect(),
        }
    }

    /// Factor `value`, consulting and updating the memo table.
    pub fn factor(&mut self, value: &BigInt) -> Factorization {
        if let Some(hit) = self.memo.get(value) {
            return hit.clone();
        }
        // Not memoized: such values may have been rounded before they got here.
        let Some(mut rest) = value.magnitude().to_u64().filter(|&m| m <= MAX_SAFE_INTEGER) else {
            return Factorization::Unknown;
        };

        let mut factors = Vec::new();
        if value.is_negative() {
            factors.push(Factor::new(-1, 1));
        }
        for &p in &self.primes {
            if rest == 1 {
                break;
            }
            let mut power = 0u32;
            while rest % p == 0 {
                power += 1;
                rest /= p;
            }
            if power > 0 {
                factors.push(Factor::new(p, power));
            }
        }

        let result = if rest < CERTIFIED_PRIME_BOUND {
            if rest > 1 {
                factors.push(Factor::new(rest, 1));
                self.learn_prime(rest);
            }
            factors.sort_by(|a, b| a.base.cmp(&b.base));
            Factorization::Known(factors)
        } else {
            Factorization::Unknown
        };
        self.memo.insert(value.clone(), result.clone());
        result
    }

    /// Number of primes currently tabulated.
    #[must_use]
    pub fn prime_count(&self) -> usize {
        self.primes.len()
    }

    /// Number of memoized results.
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    fn learn_prime(&mut self, p: u64) {
        if let Err(pos) = self.primes.binary_search(&p) {
            tracing::trace!(prime = p, "adding certified prime to table");
            self.primes.insert(pos, p);
        }
    }
}

impl Default for Factorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// A factorizer shared between sequences.
pub type SharedFactorizer = Arc<Mutex<Factorizer>>;

/// The process-wide factorizer, created on first use.
#[must_use]
pub fn global_factorizer() -> SharedFactorizer {
    static GLOBAL: OnceLock<SharedFactorizer> = OnceLock::new();
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(Mutex::new(Factorizer::new()))))
}

/// Factor `value` with the process-wide factorizer.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use seqscope_core::factor::{simple_factor, Factor, Factorization};
///
/// let f = simple_factor(&BigInt::from(991 * 997));
/// assert_eq!(f, Factorization::Known(vec![Factor::new(991, 1), Factor::new(997, 1)]));
/// ```
#[must_use]
pub fn simple_factor(value: &BigInt) -> Factorization {
    global_factorizer().lock().factor(value)
}
