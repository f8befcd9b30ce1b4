//! A sequence with the same value at every nonnegative index.
//!
//! Nothing is worth caching here, so this implements the contract directly.

use async_trait::async_trait;
use num_bigint::BigInt;

use crate::factor::{global_factorizer, Factorization};
use crate::sequence::{check_range, Index, Last, Sequence, SequenceError};

pub struct ConstantSequence {
    value: BigInt,
    name: String,
    factors: Option<Factorization>,
    ready: bool,
}

impl ConstantSequence {
    #[must_use]
    pub fn new(value: BigInt) -> Self {
        Self {
            name: format!("Constant = {value}"),
            value,
            factors: None,
            ready: false,
        }
    }

    #[must_use]
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    fn check(&self, n: Index) -> Result<(), SequenceError> {
        if !self.ready {
            return Err(SequenceError::NotInitialized);
        }
        check_range(n, 0, Last::Unbounded)
    }
}

#[async_trait]
impl Sequence for ConstantSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A sequence with the same value for all nonnegative indices"
    }

    fn first(&self) -> Index {
        0
    }

    fn last(&self) -> Last {
        Last::Unbounded
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn initialize(&mut self) -> Result<(), SequenceError> {
        self.ready = true;
        Ok(())
    }

    fn get_element(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        self.check(n)?;
        Ok(self.value.clone())
    }

    fn get_factors(&mut self, n: Index) -> Result<Factorization, SequenceError> {
        self.check(n)?;
        let value = &self.value;
        Ok(self
            .factors
            .get_or_insert_with(|| global_factorizer().lock().factor(value))
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::Factor;

    #[tokio::test]
    async fn same_value_everywhere() {
        let mut seq = ConstantSequence::new(BigInt::from(42));
        seq.initialize().await.unwrap();
        assert_eq!(seq.name(), "Constant = 42");
        assert_eq!(seq.get_element(0).unwrap(), BigInt::from(42));
        assert_eq!(seq.get_element(1_000_000_000).unwrap(), BigInt::from(42));
        assert_eq!(seq.last(), Last::Unbounded);
    }

    #[test]
    fn access_before_initialize_fails() {
        let mut seq = ConstantSequence::new(BigInt::from(7));
        assert_eq!(seq.get_element(0), Err(SequenceError::NotInitialized));
    }

    #[tokio::test]
    async fn negative_index_is_out_of_range() {
        let mut seq = ConstantSequence::new(BigInt::from(7));
        seq.initialize().await.unwrap();
        assert!(matches!(seq.get_element(-1), Err(SequenceError::OutOfRange { .. })));
        assert!(matches!(seq.get_factors(-1), Err(SequenceError::OutOfRange { .. })));
    }

    #[tokio::test]
    async fn factors_of_constant() {
        let mut seq = ConstantSequence::new(BigInt::from(-12));
        seq.initialize().await.unwrap();
        assert_eq!(
            seq.get_factors(3).unwrap(),
            Factorization::Known(vec![Factor::new(-1, 1), Factor::new(2, 2), Factor::new(3, 1)])
        );
    }
}
