//! Catalog error types.

use seqscope_core::SequenceError;

/// Errors raised while talking to the remote catalog or decoding its data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("malformed factorization {0:?}")]
    BadFactorString(String),

    #[error("malformed export key {key:?}: {reason}")]
    BadKey { key: String, reason: String },

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
