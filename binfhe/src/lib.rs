//! Boundary to an FHEW/TFHE functional-bootstrapping library.
//!
//! [`api`] holds the capability traits the evaluation harness is written
//! against, [`layouts`] the parameter and encoding types they exchange, and
//! [`reference`] a clear-text backend that honours the functional contract of
//! every capability without any cryptography. The reference backend is the
//! oracle used by tests and benches.

pub mod api;
pub mod error;
pub mod layouts;
pub mod reference;


pub use api::*;
pub use error::BackendError;
pub use layouts::*;
