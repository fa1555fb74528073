//! Capability traits of an FHEW-style backend.
//!
//! Every trait is implemented by the backend's context type. The harness is
//! written against these traits only and never sees lattice internals.

use crate::{
    error::BackendError,
    layouts::{BootstrapMethod, DecompositionKind, ExtractionDomain, Freshness, FuncEncoding, LweInfos, SchemeParams},
};

/// Key and ciphertext types shared by all capabilities of a backend.
pub trait BinFheScheme {
    type SecretKey;
    type Ciphertext: LweInfos + Clone;
}

pub trait ContextGenerate: BinFheScheme + Sized {
    /// Builds a context for `params`. All randomness the context consumes is derived from `seed`.
    fn generate(params: &SchemeParams, method: BootstrapMethod, seed: [u8; 32]) -> Result<Self, BackendError>;

    fn params(&self) -> &SchemeParams;
}

pub trait KeyGenerate: BinFheScheme {
    fn key_gen(&mut self) -> Result<Self::SecretKey, BackendError>;

    /// Generates the refresh and switching keys for `sk`.
    fn bootstrap_key_gen(&mut self, sk: &Self::SecretKey) -> Result<(), BackendError>;
}

pub trait LweEncryptSk: BinFheScheme {
    /// Encrypts `m mod p`. The ciphertext lives modulo `modulus`, or the context's `q` when `None`.
    fn lwe_encrypt_sk(
        &mut self,
        sk: &Self::SecretKey,
        m: u64,
        freshness: Freshness,
        p: u64,
        modulus: Option<u64>,
    ) -> Result<Self::Ciphertext, BackendError>;
}

pub trait LweDecrypt: BinFheScheme {
    /// Decrypts into `[0, p)`.
    fn lwe_decrypt(&self, sk: &Self::SecretKey, ct: &Self::Ciphertext, p: u64) -> Result<u64, BackendError>;
}

pub trait LweAddConst: BinFheScheme {
    /// Adds `c`, interpreted modulo the ciphertext modulus, to the body of `ct`.
    fn lwe_add_const_inplace(&self, ct: &mut Self::Ciphertext, c: u64);
}

pub trait MaxPlaintextSpace {
    /// Largest plaintext modulus a single bootstrap can handle with the context's parameters.
    fn max_plaintext_space(&self) -> u64;
}

/// Functional bootstrapping variants.
///
/// All variants take the lookup table for discrete encodings and the
/// [`FuncEncoding`] for approximate ones; the backend picks the one matching
/// the context's plaintext modulus.
pub trait FuncEval: BinFheScheme {
    fn eval_func(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_compress(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_cancel_sign(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding)
    -> Result<Self::Ciphertext, BackendError>;

    /// `base_g` is the gadget base of the final (non multi-value) bootstrap.
    fn eval_func_select(
        &self,
        ct: &Self::Ciphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        base_g: u32,
    ) -> Result<Self::Ciphertext, BackendError>;

    /// `p_mid` is the midpoint index splitting the pre-selected halves.
    fn eval_func_pre_select(
        &self,
        ct: &Self::Ciphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        p_mid: u64,
    ) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_select_alt(
        &self,
        ct: &Self::Ciphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        base_g: u32,
    ) -> Result<Self::Ciphertext, BackendError>;

    /// With `odd` set, the function is evaluated on `|x|` only and mirrored
    /// around `shift`, i.e. `f(x) = sign(x) * (f(|x|) - shift) + shift`.
    fn eval_func_compare(
        &self,
        ct: &Self::Ciphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        odd: bool,
        shift: f64,
        base_g: u32,
    ) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_wo_pbs1(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_wo_pbs2(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_bfv(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;

    fn eval_func_ks21(&self, ct: &Self::Ciphertext, lut: &[u64], enc: &FuncEncoding) -> Result<Self::Ciphertext, BackendError>;
}

pub trait HomDecompose: BinFheScheme {
    /// Decomposes a large-modulus ciphertext into digits in base of the
    /// context's plaintext modulus, least significant digit first.
    fn eval_decomp(&self, kind: DecompositionKind, ct: &Self::Ciphertext) -> Result<Vec<Self::Ciphertext>, BackendError>;
}

pub trait EvalRelu: BinFheScheme {
    /// ReLU of `ct` driven by its most significant digit `ct_msd`.
    fn eval_relu(
        &self,
        ct: &Self::Ciphertext,
        ct_msd: &Self::Ciphertext,
        base_g_msd: u32,
        base_g_relu: u32,
    ) -> Result<Self::Ciphertext, BackendError>;
}

/// Bridge from a large-modulus domain into the context's LWE parameters
/// (modulus switch to `q_ks`, key switch, modulus switch to `q`).
pub trait LweExtract: BinFheScheme {
    type ExtractionKey;

    fn extraction_key_gen(&mut self, sk: &Self::SecretKey, domain: &ExtractionDomain) -> Result<Self::ExtractionKey, BackendError>;

    fn extraction_encrypt(&mut self, key: &Self::ExtractionKey, m: u64, p: u64) -> Result<Self::Ciphertext, BackendError>;

    fn extraction_decrypt(&self, key: &Self::ExtractionKey, ct: &Self::Ciphertext, p: u64) -> Result<u64, BackendError>;

    fn extraction_switch(&self, key: &Self::ExtractionKey, ct: &Self::Ciphertext) -> Result<Self::Ciphertext, BackendError>;
}
