//! Error handling and exit codes.

use seqscope_core::exit_codes;
use seqscope_core::SequenceError;
use seqscope_oeis::CatalogError;

/// Exit code for a sequence error.
pub fn handle_error(err: &SequenceError) -> i32 {
    match err {
        SequenceError::OutOfRange { .. } => exit_codes::ERROR_RANGE,
        SequenceError::CachingInProgress { .. } => exit_codes::ERROR_CACHING,
        SequenceError::InvalidConfig(_) => exit_codes::ERROR_CONFIG,
        SequenceError::NotInitialized | SequenceError::Calculation(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for any error surfacing from [`run`](crate::app::run).
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<SequenceError>() {
        return handle_error(err);
    }
    match err.downcast_ref::<CatalogError>() {
        Some(CatalogError::Sequence(inner)) => handle_error(inner),
        Some(CatalogError::BadKey { .. }) => exit_codes::ERROR_CONFIG,
        _ => exit_codes::ERROR_GENERIC,
    }
}
