use binfhe::{BackendError, DecompositionKind};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("index {index} is out of range, the catalog has {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unsupported algorithm tag `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("input modulus {modulus} exceeds the {kind} ceiling of {ceiling}")]
    ModulusTooLarge {
        kind: DecompositionKind,
        modulus: u64,
        ceiling: u64,
    },

    #[error("invalid configuration `{desc}`: {reason}")]
    InvalidConfiguration { desc: String, reason: String },

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("input extraction is only defined for n = 1340 and n = 955, got n = {0}")]
    UnsupportedExtractionDimension(u32),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    pub(crate) fn invalid(desc: &str, reason: impl Into<String>) -> Self {
        HarnessError::InvalidConfiguration {
            desc: desc.to_string(),
            reason: reason.into(),
        }
    }
}
