//! Precision and correctness harness for functional bootstrapping.
//!
//! The [`catalog`] names parameter configurations, [`dispatch`] routes each
//! one to the backend evaluation of its algorithm, and the [`harness`] runs
//! encrypt/evaluate/decrypt trials against any backend implementing the
//! `binfhe` capability traits.

pub mod bases;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use bases::{select_bases, select_bases_log2};
pub use catalog::{Catalog, Configuration, DecompositionConfiguration, RealFunction, ReluConfiguration};
pub use config::RunConfig;
pub use dispatch::{Algorithm, evaluate};
pub use error::HarnessError;
pub use fixture::{CachedContext, ContextCache};
pub use harness::{DecompositionHarness, InputMode, PrecisionHarness, ReluHarness, RunOptions, Statistics, Trial};
pub use sweep::{SweepOutcome, sweep};
