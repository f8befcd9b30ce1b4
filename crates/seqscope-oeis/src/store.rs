//! Process-shared catalog data, fetched at most once per sequence.
//!
//! Each `(id, count)` pair owns a [`OnceCell`]. Concurrent requests for the
//! same pair wait on the fetch already in flight instead of issuing another.
//! A failed fetch leaves the cell empty so a later request may retry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use num_bigint::BigInt;
use parking_lot::Mutex;
use seqscope_core::{Factorization, Index};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::client::{CatalogClient, FactorsResponse, HttpCatalog, ValuesResponse};
use crate::error::CatalogError;
use crate::factors::parse_factor_string;

/// Decoded values by index.
pub type ValueTable = BTreeMap<Index, BigInt>;
/// Decoded factorizations by index.
pub type FactorTable = BTreeMap<Index, Factorization>;

type Slot<T> = Arc<OnceCell<Arc<T>>>;
type SlotMap<T> = Mutex<HashMap<(String, u64), Slot<T>>>;

/// Shared, de-duplicating cache in front of a [`CatalogClient`].
pub struct CatalogStore {
    client: Arc<dyn CatalogClient>,
    values: SlotMap<ValueTable>,
    factors: SlotMap<FactorTable>,
}

impl CatalogStore {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self {
            client,
            values: Mutex::new(HashMap::new()),
            factors: Mutex::new(HashMap::new()),
        }
    }

    /// Store backed by an [`HttpCatalog`] at `base_url`.
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpCatalog::new(base_url)))
    }

    /// Values of `id`, fetching them on first use.
    pub async fn values(&self, id: &str, count: u64) -> Result<Arc<ValueTable>, CatalogError> {
        let slot = slot(&self.values, id, count);
        slot.get_or_try_init(|| async {
            let resp = self.client.fetch_values(id, count).await?;
            let table = decode_values(id, &resp);
            info!(id, count, entries = table.len(), "fetched catalog values");
            Ok::<_, CatalogError>(Arc::new(table))
        })
        .await
        .map(Arc::clone)
    }

    /// Factorizations of `id`, fetching them on first use.
    pub async fn factors(&self, id: &str, count: u64) -> Result<Arc<FactorTable>, CatalogError> {
        let slot = slot(&self.factors, id, count);
        slot.get_or_try_init(|| async {
            let resp = self.client.fetch_factors(id, count).await?;
            let table = decode_factors(id, &resp);
            info!(id, count, entries = table.len(), "fetched catalog factors");
            Ok::<_, CatalogError>(Arc::new(table))
        })
        .await
        .map(Arc::clone)
    }

    /// Whether the values of `(id, count)` are already held.
    pub fn has_values(&self, id: &str, count: u64) -> bool {
        self.values
            .lock()
            .get(&(id.to_string(), count))
            .is_some_and(|cell| cell.initialized())
    }
}

fn slot<T>(map: &SlotMap<T>, id: &str, count: u64) -> Slot<T> {
    Arc::clone(map.lock().entry((id.to_string(), count)).or_default())
}

/// Decode a values body, skipping malformed entries.
pub fn decode_values(id: &str, resp: &ValuesResponse) -> ValueTable {
    let mut table = ValueTable::new();
    for (key, raw) in &resp.values {
        match (key.trim().parse::<Index>(), raw.trim().parse::<BigInt>()) {
            (Ok(index), Ok(value)) => {
                table.insert(index, value);
            }
            _ => warn!(id, index = %key, value = %raw, "skipping malformed catalog value"),
        }
    }
    table
}

/// Decode a factors body. Malformed factorizations become `Unknown`.
pub fn decode_factors(id: &str, resp: &FactorsResponse) -> FactorTable {
    let mut table = FactorTable::new();
    for (key, raw) in &resp.factors {
        let Ok(index) = key.trim().parse::<Index>() else {
            warn!(id, index = %key, "skipping catalog factorization with bad index");
            continue;
        };
        let factors = parse_factor_string(raw).unwrap_or_else(|err| {
            warn!(id, index, %err, "unreadable catalog factorization");
            Factorization::Unknown
        });
        table.insert(index, factors);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use seqscope_core::Factor;

    use super::*;

    #[derive(Default)]
    struct Counting {
        value_calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl CatalogClient for Counting {
        async fn fetch_values(&self, _id: &str, _count: u64) -> Result<ValuesResponse, CatalogError> {
            let call = self.value_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_first && call == 0 {
                return Err(CatalogError::Status {
                    status: 503,
                    url: "stub".into(),
                });
            }
            let values = [("0", "5"), ("1", "8")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Ok(ValuesResponse { values })
        }

        async fn fetch_factors(&self, _id: &str, _count: u64) -> Result<FactorsResponse, CatalogError> {
            Ok(FactorsResponse::default())
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let client = Arc::new(Counting::default());
        let store = CatalogStore::new(client.clone());
        let (a, b) = tokio::join!(store.values("A000001", 10), store.values("A000001", 10));
        assert_eq!(a.unwrap(), b.unwrap());
        let _ = store.values("A000001", 10).await.unwrap();
        assert_eq!(client.value_calls.load(Ordering::SeqCst), 1);
        assert!(store.has_values("A000001", 10));
    }

    #[tokio::test]
    async fn different_counts_fetch_separately() {
        let client = Arc::new(Counting::default());
        let store = CatalogStore::new(client.clone());
        store.values("A000001", 10).await.unwrap();
        store.values("A000001", 20).await.unwrap();
        assert_eq!(client.value_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let client = Arc::new(Counting {
            fail_first: true,
            ..Counting::default()
        });
        let store = CatalogStore::new(client.clone());
        assert!(store.values("A000001", 10).await.is_err());
        assert!(!store.has_values("A000001", 10));
        let table = store.values("A000001", 10).await.unwrap();
        assert_eq!(table.get(&1), Some(&BigInt::from(8)));
        assert_eq!(client.value_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn decode_skips_malformed_values() {
        let resp = ValuesResponse {
            values: [("0", "1"), ("x", "2"), ("2", "3.5"), ("3", "-40")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        let table = decode_values("A000001", &resp);
        assert_eq!(table.len(), 2);
        assert_eq!(table[&3], BigInt::from(-40));
    }

    #[test]
    fn decode_factors_marks_garbage_unknown() {
        let resp = FactorsResponse {
            factors: [("4", "[[2,2]]"), ("5", "[[5"), ("6", "no_fac")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        let table = decode_factors("A000001", &resp);
        assert_eq!(table[&4], Factorization::Known(vec![Factor::new(2, 2)]));
        assert_eq!(table[&5], Factorization::Unknown);
        assert_eq!(table[&6], Factorization::Unknown);
    }
}
