//! Independent uniform draws from an inclusive integer range.
//!
//! Each draw happens exactly once per index; the cache guarantees repeated
//! requests see the same value and that the cached value is what gets factored.

use num_bigint::BigInt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cached::{Cached, TrialDivision, ValueHook};
use crate::options::CacheOptions;
use crate::sequence::{Index, SequenceError};

/// Default inclusive lower bound of a draw.
pub const DEFAULT_MIN: i64 = 0;

/// Default inclusive upper bound of a draw.
pub const DEFAULT_MAX: i64 = 9;

/// Value hook drawing from `[min, max]`.
pub struct RandomValues {
    min: i64,
    max: i64,
    rng: StdRng,
}

impl RandomValues {
    /// Validate the range and seed the generator (from entropy when `seed` is `None`).
    pub fn new(min: i64, max: i64, seed: Option<u64>) -> Result<Self, SequenceError> {
        if max < min {
            return Err(SequenceError::InvalidConfig(
                "the max value cannot be less than the min".into(),
            ));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { min, max, rng })
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }
}

impl ValueHook for RandomValues {
    fn calculate(&mut self, _n: Index) -> Result<BigInt, SequenceError> {
        Ok(BigInt::from(self.rng.gen_range(self.min..=self.max)))
    }
}

pub type RandomSequence = Cached<RandomValues, TrialDivision>;

/// Random integers in `[min, max]`, starting at index 0 with no limit.
pub fn random_sequence(
    min: i64,
    max: i64,
    seed: Option<u64>,
    opts: CacheOptions,
) -> Result<RandomSequence, SequenceError> {
    let values = RandomValues::new(min, max, seed)?;
    Ok(Cached::new(values, TrialDivision::new(), opts)
        .with_name(format!("Random integers {min} to {max}"))
        .with_description(format!(
            "A sequence of integers chosen independently uniformly from {min} to {max} inclusive"
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            random_sequence(5, 4, None, CacheOptions::default()),
            Err(SequenceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn draws_stay_in_range_and_repeat() {
        let mut seq = random_sequence(-3, 3, Some(1), CacheOptions::default()).unwrap();
        seq.initialize_sync().unwrap();
        for n in 0..1000 {
            let v = seq.get_element(n).unwrap();
            assert!(v >= BigInt::from(-3) && v <= BigInt::from(3));
            assert_eq!(seq.get_element(n).unwrap(), v);
        }
    }

    #[test]
    fn seeded_sequences_agree() {
        let mut a = random_sequence(0, 1_000_000, Some(42), CacheOptions::default()).unwrap();
        let mut b = random_sequence(0, 1_000_000, Some(42), CacheOptions::default()).unwrap();
        a.initialize_sync().unwrap();
        b.initialize_sync().unwrap();
        for n in [0, 17, 300] {
            assert_eq!(a.get_element(n).unwrap(), b.get_element(n).unwrap());
        }
    }

    #[test]
    fn factorization_matches_cached_draw() {
        let mut seq = random_sequence(1, 1_000_000, Some(9), CacheOptions::default()).unwrap();
        seq.initialize_sync().unwrap();
        for n in 0..300 {
            let v = seq.get_element(n).unwrap();
            assert_eq!(seq.get_factors(n).unwrap().product(), Some(v));
        }
    }

    #[test]
    fn degenerate_range() {
        let mut seq = random_sequence(7, 7, None, CacheOptions::default()).unwrap();
        seq.initialize_sync().unwrap();
        assert_eq!(seq.get_element(3).unwrap(), BigInt::from(7));
        assert_eq!(seq.name(), "Random integers 7 to 7");
        assert_eq!(seq.values().min(), 7);
    }
}
