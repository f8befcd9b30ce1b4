//! # seqscope-oeis
//!
//! Sequences fetched in bulk from the OEIS through a catalog backend.
//!
//! The [`CatalogStore`] sits in front of a [`CatalogClient`] and shares
//! fetched data between every [`OeisSequence`] with the same id. Remote
//! failures are reported through a [`Notifier`] and leave the sequence empty.

pub mod client;
pub mod error;
pub mod factors;
pub mod key;
pub mod notify;
pub mod options;
pub mod sequence;
pub mod store;

// Re-exports
pub use client::{CatalogClient, FactorsResponse, HttpCatalog, ValuesResponse, DEFAULT_BASE_URL};
pub use error::CatalogError;
pub use key::ExportKey;
pub use notify::{CollectingNotifier, Notifier, TracingNotifier};
pub use options::OeisOptions;
pub use sequence::{normalize_id, FetchState, OeisSequence};
pub use store::CatalogStore;
