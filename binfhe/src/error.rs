use thiserror::Error;

/// Failure reported by an FHE backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("invalid scheme parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("plaintext modulus {0} is not supported")]
    PlaintextModulus(u64),

    #[error("ciphertext modulus {modulus} is not supported: {reason}")]
    CiphertextModulus { modulus: u64, reason: &'static str },

    #[error("lookup table has {got} entries but the plaintext modulus is {expected}")]
    LutSize { expected: u64, got: usize },

    #[error("approximate evaluation needs a function, non-zero scale factors and an output modulus")]
    MissingEncoding,

    #[error("gadget base {0} must be a power of two greater than one")]
    InvalidBase(u32),

    #[error("{0} requires an auxiliary modulus")]
    MissingAuxModulus(&'static str),

    #[error("{0} requires multi-level gadget bases")]
    MissingMultiLevelBases(&'static str),

    #[error("secret key does not match the ciphertext")]
    KeyMismatch,

    #[error("bootstrapping keys have not been generated")]
    MissingBootstrapKey,
}
