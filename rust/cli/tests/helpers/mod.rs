//! Shared pieces for the CLI integration tests.
//!
//! - `cli_runner`: calls [`blindjack_cli::run`] with captured streams and
//!   temporary environment variables.
//! - `assertions`: checks on JSONL round logs.
//! - `records`: builders for hand-made round records.

pub mod assertions;
pub mod cli_runner;
pub mod records;
