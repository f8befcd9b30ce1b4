//! seqscope library: application logic for the sequence browser CLI.

pub mod app;
pub mod completion;
pub mod config;
pub mod errors;
pub mod output;
