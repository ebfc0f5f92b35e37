//! Shared infrastructure for the Lime compiler crates.
//!
//! This crate has no knowledge of Lime's grammar or semantics; it only
//! provides the primitives the other stages build on. Currently that's
//! just `UtilError`, the error type `lime-gen`'s `ImportStatement`
//! lowering reaches for when it re-reads a file path.

pub mod error;

pub use error::{UtilError, UtilResult};
