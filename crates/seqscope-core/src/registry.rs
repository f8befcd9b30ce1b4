//! Factory for the locally computed sequence families.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigInt;

use crate::constant::ConstantSequence;
use crate::formula::formula_sequence;
use crate::naturals::naturals;
use crate::options::CacheOptions;
use crate::random::{random_sequence, DEFAULT_MAX, DEFAULT_MIN};
use crate::sequence::{Last, Sequence, SequenceError};

/// Named parameters, as strings, for constructing a family member.
pub type Params = BTreeMap<String, String>;

/// A sequence family offered by a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Families built by [`DefaultFactory`].
pub const FAMILIES: [FamilyInfo; 4] = [
    FamilyInfo {
        name: "naturals",
        description: "A sequence of the natural numbers",
    },
    FamilyInfo {
        name: "constant",
        description: "A sequence with the same value for all nonnegative indices",
    },
    FamilyInfo {
        name: "random",
        description: "Random integers chosen uniformly from a range",
    },
    FamilyInfo {
        name: "formula",
        description: "A sequence defined by a formula in n",
    },
];

/// A freshly built sequence and the id it was issued.
pub struct RegisteredSequence {
    pub id: u64,
    pub sequence: Box<dyn Sequence>,
}

/// Factory trait for creating sequences.
pub trait SequenceFactory: Send + Sync {
    /// Build a new, uninitialized member of `family`.
    fn create(&self, family: &str, params: &Params) -> Result<RegisteredSequence, SequenceError>;

    /// List all available family names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory issuing increasing sequence ids.
pub struct DefaultFactory {
    next_id: AtomicU64,
}

impl DefaultFactory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    fn build(family: &str, params: &Params) -> Result<Box<dyn Sequence>, SequenceError> {
        match family {
            "naturals" => {
                let include_zero = param(params, "include_zero")?.unwrap_or(false);
                Ok(Box::new(naturals(include_zero, cache_options(params)?)))
            }
            // Constant sequences are uncached with fixed bounds, so
            // `cache_block` is ignored and `first`/`last` are refused.
            "constant" => {
                if let Some(key) = ["first", "last"].into_iter().find(|k| params.contains_key(*k)) {
                    return Err(SequenceError::InvalidConfig(format!(
                        "parameter {key} is not supported by constant sequences"
                    )));
                }
                let value: BigInt = param(params, "value")?.unwrap_or_default();
                Ok(Box::new(ConstantSequence::new(value)))
            }
            "random" => {
                let min = param(params, "min")?.unwrap_or(DEFAULT_MIN);
                let max = param(params, "max")?.unwrap_or(DEFAULT_MAX);
                let seed = param(params, "seed")?;
                Ok(Box::new(random_sequence(min, max, seed, cache_options(params)?)?))
            }
            "formula" => {
                let source = params.get("formula").map_or("n", String::as_str);
                Ok(Box::new(formula_sequence(source, cache_options(params)?)?))
            }
            _ => Err(SequenceError::InvalidConfig(format!(
                "unknown sequence family: {family}"
            ))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceFactory for DefaultFactory {
    fn create(&self, family: &str, params: &Params) -> Result<RegisteredSequence, SequenceError> {
        let sequence = Self::build(family, params)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, family, name = sequence.name(), "created sequence");
        Ok(RegisteredSequence { id, sequence })
    }

    fn available(&self) -> Vec<&str> {
        FAMILIES.iter().map(|f| f.name).collect()
    }
}

/// Parse an optional parameter.
pub fn param<T>(params: &Params, key: &str) -> Result<Option<T>, SequenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    params
        .get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                SequenceError::InvalidConfig(format!("parameter {key}={raw:?}: {e}"))
            })
        })
        .transpose()
}

/// Read `first`, `last` and `cache_block` from `params`.
pub fn cache_options(params: &Params) -> Result<CacheOptions, SequenceError> {
    let mut opts = CacheOptions::default();
    if let Some(first) = param(params, "first")? {
        opts.first = first;
    }
    if let Some(raw) = params.get("last") {
        opts.last = match raw.trim() {
            "inf" | "infinity" | "unbounded" => Last::Unbounded,
            _ => Last::Finite(param(params, "last")?.unwrap_or_default()),
        };
    }
    if let Some(block) = param(params, "cache_block")? {
        opts.cache_block = block;
    }
    Ok(opts.normalize())
}
