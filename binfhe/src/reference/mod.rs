//! Clear-text reference backend.
//!
//! Ciphertexts carry their phase in the clear together with the modulus they
//! live in and the identity of the key they were produced under. Fresh
//! encryptions get Gaussian noise with the context's standard deviation;
//! bootstrapped outputs are exact roundings. Every capability validates its
//! inputs the way a real library would reject them.

mod decomp;
mod extract;
mod func_eval;
mod lwe;

use std::sync::atomic::{AtomicU64, Ordering};

use sampling::Source;
use tracing::debug;

pub use extract::ClearExtractionKey;
pub use lwe::{ClearCiphertext, ClearSecretKey};

use crate::{
    api::{BinFheScheme, ContextGenerate, KeyGenerate, MaxPlaintextSpace},
    error::BackendError,
    layouts::{BootstrapMethod, SchemeParams},
};

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_key_id() -> u64 {
    NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed)
}

pub struct ClearContext {
    params: SchemeParams,
    source: Source,
    bootstrap_key: Option<u64>,
}

impl ClearContext {
    fn check_bootstrap(&self, ct: &ClearCiphertext) -> Result<(), BackendError> {
        match self.bootstrap_key {
            None => Err(BackendError::MissingBootstrapKey),
            Some(id) if id != ct.key => Err(BackendError::KeyMismatch),
            Some(_) => Ok(()),
        }
    }
}

impl BinFheScheme for ClearContext {
    type SecretKey = ClearSecretKey;
    type Ciphertext = ClearCiphertext;
}

impl ContextGenerate for ClearContext {
    fn generate(params: &SchemeParams, method: BootstrapMethod, seed: [u8; 32]) -> Result<Self, BackendError> {
        validate(params)?;
        debug!(n = params.n, ring_dim = params.ring_dim, q = params.q, p = params.plaintext_modulus, ?method, "generated context");
        Ok(ClearContext {
            params: params.clone(),
            source: Source::new(seed),
            bootstrap_key: None,
        })
    }

    fn params(&self) -> &SchemeParams {
        &self.params
    }
}

impl KeyGenerate for ClearContext {
    fn key_gen(&mut self) -> Result<ClearSecretKey, BackendError> {
        Ok(ClearSecretKey { id: next_key_id() })
    }

    fn bootstrap_key_gen(&mut self, sk: &ClearSecretKey) -> Result<(), BackendError> {
        self.bootstrap_key = Some(sk.id);
        Ok(())
    }
}

impl MaxPlaintextSpace for ClearContext {
    fn max_plaintext_space(&self) -> u64 {
        max_plaintext_space(self.params.q, self.params.beta_precise)
    }
}

/// Largest power of two not above `q / (2 * beta)`.
fn max_plaintext_space(q: u64, beta: u32) -> u64 {
    let bound: u64 = q / (2 * beta.max(1) as u64);
    if bound == 0 {
        return 1;
    }
    1 << (63 - bound.leading_zeros())
}

fn validate(params: &SchemeParams) -> Result<(), BackendError> {
    let invalid = |name: &'static str, reason: &str| BackendError::InvalidParameter {
        name,
        reason: reason.to_string(),
    };

    if params.n == 0 {
        return Err(invalid("n", "must be non-zero"));
    }
    if !params.ring_dim.is_power_of_two() {
        return Err(invalid("ring_dim", "must be a power of two"));
    }
    if params.q < 4 || !params.q.is_power_of_two() {
        return Err(invalid("q", "must be a power of two of at least 4"));
    }
    if params.big_q <= params.q {
        return Err(invalid("big_q", "must exceed q"));
    }
    if params.q_ks < params.q {
        return Err(invalid("q_ks", "must not be below q"));
    }
    if !(params.std.is_finite() && params.std >= 0.0) {
        return Err(invalid("std", "must be finite and non-negative"));
    }
    if params.beta_precise == 0 {
        return Err(invalid("beta_precise", "must be non-zero"));
    }
    check_base(params.base_ks)?;
    check_base(params.base_g)?;
    params.base_gs.iter().try_for_each(|&base| check_base(base))?;

    let p: u64 = params.plaintext_modulus;
    if p != 0 && (p < 2 || p > max_plaintext_space(params.q, params.beta_precise)) {
        return Err(BackendError::PlaintextModulus(p));
    }
    Ok(())
}

pub(crate) fn check_base(base: u32) -> Result<(), BackendError> {
    if base < 2 || !base.is_power_of_two() {
        return Err(BackendError::InvalidBase(base));
    }
    Ok(())
}

/// Rounds `x / from` onto the grid `1 / to`, i.e. `round(x * to / from) mod to`.
pub(crate) fn mod_switch(x: u64, from: u64, to: u64) -> u64 {
    let from: u128 = from as u128;
    let to: u128 = to as u128;
    (((x as u128 % from) * to + from / 2) / from % to) as u64
}

pub(crate) fn add_signed(x: u64, e: i64, modulus: u64) -> u64 {
    (x as i128 + e as i128).rem_euclid(modulus as i128) as u64
}

pub(crate) fn centered(x: u64, modulus: u64) -> i64 {
    if x >= modulus.div_ceil(2) {
        x as i64 - modulus as i64
    } else {
        x as i64
    }
}
