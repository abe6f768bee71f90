//! biodata-cli library root.
//!
//! Re-exports internal modules so that examples and integration tests
//! can exercise them directly without going through argument parsing.

pub mod cli;
pub mod commands;
pub mod config;
pub mod form_input;
