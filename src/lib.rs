//! Cross-crate integration tests for the seqscope workspace live in `tests/`.
