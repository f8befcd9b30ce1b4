//! The natural numbers, mostly as an example of a cached family.

use num_bigint::BigInt;

use crate::cached::{Cached, TrialDivision, ValueHook};
use crate::options::CacheOptions;
use crate::sequence::{Index, SequenceError};

/// Value hook producing `n + begin`.
#[derive(Debug, Clone, Copy)]
pub struct NaturalValues {
    begin: i64,
}

impl ValueHook for NaturalValues {
    fn calculate(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        Ok(BigInt::from(n) + self.begin)
    }
}

pub type Naturals = Cached<NaturalValues, TrialDivision>;

/// Positive integers starting at index 0, or the nonnegative integers
/// when `include_zero` is set.
#[must_use]
pub fn naturals(include_zero: bool, opts: CacheOptions) -> Naturals {
    let (begin, name) = if include_zero {
        (0, "Nonnegative Integers")
    } else {
        (1, "Positive Integers")
    };
    Cached::new(NaturalValues { begin }, TrialDivision::new(), opts)
        .with_name(name)
        .with_description("A sequence of the natural numbers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::{Factor, Factorization};
    use crate::sequence::Sequence;

    #[test]
    fn positive_integers() {
        let mut seq = naturals(false, CacheOptions::default());
        seq.initialize_sync().unwrap();
        assert_eq!(seq.name(), "Positive Integers");
        assert_eq!(seq.get_element(0).unwrap(), BigInt::from(1));
        assert_eq!(seq.get_element(499).unwrap(), BigInt::from(500));
    }

    #[test]
    fn nonnegative_integers() {
        let mut seq = naturals(true, CacheOptions::default());
        seq.initialize_sync().unwrap();
        assert_eq!(seq.name(), "Nonnegative Integers");
        assert_eq!(seq.get_element(0).unwrap(), BigInt::from(0));
        assert_eq!(seq.get_factors(0).unwrap(), Factorization::zero());
        assert_eq!(seq.get_factors(1).unwrap(), Factorization::one());
    }

    #[test]
    fn factors_of_positive_integers() {
        let mut seq = naturals(false, CacheOptions::default());
        seq.initialize_sync().unwrap();
        assert_eq!(
            seq.get_factors(11).unwrap(),
            Factorization::Known(vec![Factor::new(2, 2), Factor::new(3, 1)])
        );
    }
}
