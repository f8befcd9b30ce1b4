//! Sequences populated in bulk from the remote catalog.
//!
//! An [`OeisSequence`] learns its bounds from the first value fetch. Both
//! fetches happen once, inside `initialize`, and every failure is handed to
//! the [`Notifier`] instead of being returned: a sequence that could not be
//! fetched is simply empty (`first > last`).

use std::sync::Arc;

use async_trait::async_trait;
use num_bigint::BigInt;
use num_integer::Integer;
use seqscope_core::{
    check_range, global_factorizer, Factorization, Index, Last, Sequence, SequenceError,
    SharedFactorizer,
};
use tracing::warn;

use crate::error::CatalogError;
use crate::key::ExportKey;
use crate::notify::{Notifier, TracingNotifier};
use crate::options::OeisOptions;
use crate::store::{CatalogStore, FactorTable, ValueTable};

/// Progress of the one-shot catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    NotStarted,
    InFlight,
    Complete,
}

/// Check that `raw` looks like an OEIS A-number and return it upper-cased.
pub fn normalize_id(raw: &str) -> Result<String, SequenceError> {
    let id = raw.trim();
    let valid = id.len() == 7
        && id.starts_with(['A', 'a'])
        && id[1..].bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(SequenceError::InvalidConfig(format!(
            "OEIS IDs are of form Annnnnn, got {raw:?}"
        )));
    }
    Ok(id.to_ascii_uppercase())
}

/// A sequence backed by the remote catalog.
pub struct OeisSequence {
    id: String,
    name: String,
    description: String,
    options: OeisOptions,
    store: Arc<CatalogStore>,
    notifier: Arc<dyn Notifier>,
    factorizer: SharedFactorizer,
    first: Index,
    last: Last,
    values: Vec<BigInt>,
    factors: Vec<Factorization>,
    state: FetchState,
}

impl OeisSequence {
    /// Validate `id` and `options`; nothing is fetched until `initialize`.
    pub fn new(
        id: &str,
        options: OeisOptions,
        store: Arc<CatalogStore>,
    ) -> Result<Self, SequenceError> {
        let id = normalize_id(id)?;
        let options = options.normalize();
        options.validate()?;
        let name = options.name.clone().unwrap_or_else(|| id.clone());
        let mut description = format!("OEIS {id}");
        if let Some(m) = options.reduction() {
            description.push_str(&format!(" (mod {m})"));
        }
        Ok(Self {
            id,
            name,
            description,
            options,
            store,
            notifier: Arc::new(TracingNotifier),
            factorizer: global_factorizer(),
            first: 0,
            last: Last::Unbounded,
            values: Vec::new(),
            factors: Vec::new(),
            state: FetchState::NotStarted,
        })
    }

    /// Rebuild a sequence from its export key.
    pub fn from_key(key: &str, store: Arc<CatalogStore>) -> Result<Self, CatalogError> {
        let key: ExportKey = key.parse()?;
        let options = OeisOptions {
            count: key.count,
            modulus: key.modulus,
            name: Some(key.name),
        };
        Ok(Self::new(&key.id, options, store)?)
    }

    /// Export key that [`from_key`](Self::from_key) turns back into this sequence.
    pub fn to_key(&self) -> String {
        ExportKey {
            id: self.id.clone(),
            count: self.options.count,
            modulus: self.options.modulus.clone(),
            name: self.name.clone(),
        }
        .to_string()
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use `factorizer` for locally factored (reduced) values.
    #[must_use]
    pub fn with_factorizer(mut self, factorizer: SharedFactorizer) -> Self {
        self.factorizer = factorizer;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &OeisOptions {
        &self.options
    }

    pub fn fetch_state(&self) -> FetchState {
        self.state
    }

    fn load_values(&mut self, table: &ValueTable) {
        let Some((&first, _)) = table.first_key_value() else {
            self.set_empty();
            return;
        };
        let mut last = first;
        let mut next = Some(first);
        for (&index, value) in table {
            if next != Some(index) {
                warn!(
                    id = %self.id,
                    expected = ?next,
                    found = index,
                    "catalog values have a gap, truncating"
                );
                break;
            }
            let value = match self.options.reduction() {
                Some(m) => value.mod_floor(m),
                None => value.clone(),
            };
            self.values.push(value);
            last = index;
            next = index.checked_add(1);
        }
        self.first = first;
        self.last = Last::Finite(last);
        self.factors = vec![Factorization::Unknown; self.values.len()];
    }

    fn load_factors(&mut self, table: &FactorTable) {
        let Last::Finite(last) = self.last else {
            return;
        };
        for (&index, factors) in table.range(self.first..=last) {
            if let Ok(slot) = usize::try_from(index - self.first) {
                self.factors[slot] = factors.clone();
            }
        }
    }

    fn factor_locally(&mut self) {
        let mut factorizer = self.factorizer.lock();
        self.factors = self.values.iter().map(|v| factorizer.factor(v)).collect();
    }

    fn set_empty(&mut self) {
        self.description = format!("Unknown OEIS sequence {}", self.id);
        self.first = 0;
        self.last = Last::Finite(-1);
        self.values.clear();
        self.factors.clear();
    }

    fn slot(&self, n: Index) -> Result<usize, SequenceError> {
        if self.state != FetchState::Complete {
            return Err(SequenceError::NotInitialized);
        }
        check_range(n, self.first, self.last)?;
        usize::try_from(n - self.first)
            .map_err(|_| SequenceError::Calculation(format!("index {n} has no cache slot")))
    }
}

#[async_trait]
impl Sequence for OeisSequence {
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
        self.state == FetchState::Complete
    }

    async fn initialize(&mut self) -> Result<(), SequenceError> {
        if self.state == FetchState::Complete {
            return Ok(());
        }
        // `InFlight` here means an earlier call was dropped mid-fetch; start
        // over. The store still shares any fetch that finished.
        self.values.clear();
        self.factors.clear();
        self.state = FetchState::InFlight;

        let count = self.options.count;
        match self.store.values(&self.id, count).await {
            Ok(table) => self.load_values(&table),
            Err(err) => {
                self.notifier
                    .notify(&format!("Could not load OEIS sequence {}: {err}", self.id));
                self.set_empty();
            }
        }

        if !self.values.is_empty() {
            if self.options.reduction().is_some() {
                self.factor_locally();
            } else {
                match self.store.factors(&self.id, count).await {
                    Ok(table) => self.load_factors(&table),
                    Err(err) => self.notifier.notify(&format!(
                        "Could not load factors of OEIS sequence {}: {err}",
                        self.id
                    )),
                }
            }
        }

        self.state = FetchState::Complete;
        Ok(())
    }

    fn get_element(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        let slot = self.slot(n)?;
        Ok(self.values[slot].clone())
    }

    fn get_factors(&mut self, n: Index) -> Result<Factorization, SequenceError> {
        let slot = self.slot(n)?;
        Ok(self.factors[slot].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_validation() {
        assert_eq!(normalize_id("A000045").unwrap(), "A000045");
        assert_eq!(normalize_id(" a000040 ").unwrap(), "A000040");
        for bad in ["", "A45", "B000045", "A00004x", "A0000450", "AA00045"] {
            assert!(normalize_id(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn names_and_description() {
        let store = Arc::new(CatalogStore::http("http://127.0.0.1:9"));
        let seq = OeisSequence::new("a000045", OeisOptions::default(), store.clone()).unwrap();
        assert_eq!(seq.name(), "A000045");
        assert_eq!(seq.description(), "OEIS A000045");
        assert_eq!(seq.fetch_state(), FetchState::NotStarted);

        let opts = OeisOptions::default().with_modulus(10).with_name("Fibonacci");
        let seq = OeisSequence::new("A000045", opts, store).unwrap();
        assert_eq!(seq.name(), "Fibonacci");
        assert_eq!(seq.description(), "OEIS A000045 (mod 10)");
    }

    #[test]
    fn negative_modulus_rejected() {
        let store = Arc::new(CatalogStore::http("http://127.0.0.1:9"));
        let opts = OeisOptions::default().with_modulus(-2);
        assert!(matches!(
            OeisSequence::new("A000045", opts, store),
            Err(SequenceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn access_before_initialize() {
        let store = Arc::new(CatalogStore::http("http://127.0.0.1:9"));
        let mut seq = OeisSequence::new("A000045", OeisOptions::default(), store).unwrap();
        assert_eq!(seq.get_element(0), Err(SequenceError::NotInitialized));
    }

    #[test]
    fn key_round_trip() {
        let store = Arc::new(CatalogStore::http("http://127.0.0.1:9"));
        let key = "@A000045~500~7~Fibonacci ~ mod 7";
        let seq = OeisSequence::from_key(key, store.clone()).unwrap();
        assert_eq!(seq.to_key(), key);
        assert_eq!(seq.options().count, 500);

        let seq = OeisSequence::new("A000040", OeisOptions::default(), store.clone()).unwrap();
        let again = OeisSequence::from_key(&seq.to_key(), store).unwrap();
        assert_eq!(again.to_key(), seq.to_key());
        assert_eq!(again.to_key(), "@A000040~1000~0~A000040");
    }

    #[test]
    fn bad_keys() {
        let store = Arc::new(CatalogStore::http("http://127.0.0.1:9"));
        assert!(matches!(
            OeisSequence::from_key("A000045~1~0~x", store.clone()),
            Err(CatalogError::BadKey { .. })
        ));
        assert!(matches!(
            OeisSequence::from_key("@Z000045~1~0~x", store),
            Err(CatalogError::Sequence(SequenceError::InvalidConfig(_)))
        ));
    }
}
