//! Options for remote-backed sequences.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use seqscope_core::SequenceError;

/// Number of entries requested from the catalog by default.
pub const DEFAULT_COUNT: u64 = 1000;

/// Configuration of one [`OeisSequence`](crate::sequence::OeisSequence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OeisOptions {
    /// How many entries to request from the catalog.
    pub count: u64,
    /// Reduce every value modulo this; zero leaves values unchanged.
    pub modulus: BigInt,
    /// Display name; defaults to the external id.
    pub name: Option<String>,
}

impl Default for OeisOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            modulus: BigInt::zero(),
            name: None,
        }
    }
}

impl OeisOptions {
    /// Replace zero values with defaults.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.count == 0 {
            self.count = DEFAULT_COUNT;
        }
        self
    }

    /// Reject a negative modulus.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if self.modulus.is_negative() {
            return Err(SequenceError::InvalidConfig(format!(
                "modulus {} can't be negative",
                self.modulus
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_modulus(mut self, modulus: impl Into<BigInt>) -> Self {
        self.modulus = modulus.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The modulus, if reduction is enabled.
    #[must_use]
    pub fn reduction(&self) -> Option<&BigInt> {
        (!self.modulus.is_zero()).then_some(&self.modulus)
    }
}
