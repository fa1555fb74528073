use std::fmt;

use serde::{Deserialize, Serialize};

/// Blind-rotation flavour used by the bootstrapping keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BootstrapMethod {
    #[default]
    Ginx,
}

/// Whether an encryption carries fresh noise or is a trivial (noiseless) encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Trivial,
}

/// Which public-key material the context prepares for the evaluation variants that need it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicKeyMode {
    #[default]
    None,
    Const,
    Half,
    Full,
    HalfTrans,
}

/// Homomorphic digit-decomposition algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecompositionKind {
    HomFloor,
    HomFloorAlt,
    Reduce,
    Compress,
}

impl DecompositionKind {
    pub const ALL: [DecompositionKind; 4] = [
        DecompositionKind::HomFloor,
        DecompositionKind::HomFloorAlt,
        DecompositionKind::Reduce,
        DecompositionKind::Compress,
    ];

    /// Largest input ciphertext modulus the algorithm decomposes correctly.
    pub fn modulus_ceiling(&self) -> u64 {
        match self {
            DecompositionKind::HomFloor => 1 << 29,
            DecompositionKind::HomFloorAlt => 1 << 31,
            DecompositionKind::Reduce => 1 << 31,
            DecompositionKind::Compress => 1 << 33,
        }
    }
}

impl fmt::Display for DecompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            DecompositionKind::HomFloor => "HomFloor",
            DecompositionKind::HomFloorAlt => "HomFloorAlt",
            DecompositionKind::Reduce => "HomDecomp-Reduce",
            DecompositionKind::Compress => "HomDecomp-FDFB",
        };
        f.write_str(name)
    }
}

/// Full parameter bundle handed to context generation.
///
/// Only `n`, `ring_dim`, `q`, `big_q`, `q_ks`, `std`, `base_ks`, `base_g` and
/// `beta_precise` are mandatory. The remaining fields default to zero/empty
/// and are only consulted by the evaluation variants that need them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeParams {
    /// LWE dimension.
    pub n: u32,
    /// Ring dimension `N`.
    pub ring_dim: u32,
    /// LWE ciphertext modulus.
    pub q: u64,
    /// Ring modulus `Q`.
    pub big_q: u64,
    /// Key-switching modulus.
    pub q_ks: u64,
    /// Standard deviation of the encryption noise.
    pub std: f64,
    pub base_ks: u32,
    pub base_g: u32,
    #[serde(default)]
    pub base_r: u32,
    #[serde(default)]
    pub base_pk: u32,
    #[serde(default)]
    pub q_from: u64,
    #[serde(default)]
    pub base_g0: u32,
    #[serde(default)]
    pub base_gmv: u32,
    pub beta_precise: u32,
    /// Plaintext modulus the context is generated for, 0 for approximate encodings.
    #[serde(default)]
    pub plaintext_modulus: u64,
    /// Per-level gadget bases, first level first.
    #[serde(default)]
    pub base_gs: Vec<u32>,
    #[serde(default)]
    pub pk_mode: PublicKeyMode,
    #[serde(default)]
    pub multithread: bool,
    /// Auxiliary modulus `P`.
    #[serde(default)]
    pub aux_modulus: u64,
    /// Relinearization base.
    #[serde(default)]
    pub base_rl: u32,
}

impl SchemeParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(n: u32, ring_dim: u32, q: u64, big_q: u64, q_ks: u64, std: f64, base_ks: u32, base_g: u32, beta_precise: u32) -> Self {
        SchemeParams {
            n,
            ring_dim,
            q,
            big_q,
            q_ks,
            std,
            base_ks,
            base_g,
            base_r: 0,
            base_pk: 0,
            q_from: 0,
            base_g0: 0,
            base_gmv: 0,
            beta_precise,
            plaintext_modulus: 0,
            base_gs: Vec::new(),
            pk_mode: PublicKeyMode::None,
            multithread: false,
            aux_modulus: 0,
            base_rl: 0,
        }
    }

    pub fn with_public_key(mut self, base_pk: u32, q_from: u64, pk_mode: PublicKeyMode) -> Self {
        self.base_pk = base_pk;
        self.q_from = q_from;
        self.pk_mode = pk_mode;
        self
    }

    pub fn with_base_g0(mut self, base_g0: u32) -> Self {
        self.base_g0 = base_g0;
        self
    }

    pub fn with_base_gmv(mut self, base_gmv: u32) -> Self {
        self.base_gmv = base_gmv;
        self
    }

    pub fn with_base_g(mut self, base_g: u32) -> Self {
        self.base_g = base_g;
        self
    }

    pub fn with_base_gs(mut self, base_gs: Vec<u32>) -> Self {
        self.base_gs = base_gs;
        self
    }

    pub fn with_aux_modulus(mut self, aux_modulus: u64, base_rl: u32) -> Self {
        self.aux_modulus = aux_modulus;
        self.base_rl = base_rl;
        self
    }

    pub fn with_plaintext_modulus(mut self, p: u64) -> Self {
        self.plaintext_modulus = p;
        self
    }

    pub fn with_multithread(mut self, multithread: bool) -> Self {
        self.multithread = multithread;
        self
    }
}

/// Fixed-point scaling and the real function evaluated under an approximate encoding.
/// Discrete evaluations leave every field at its zero value.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuncEncoding {
    pub delta_in: f64,
    pub delta_out: f64,
    pub q_out: u64,
    pub function: Option<fn(f64) -> f64>,
}

impl FuncEncoding {
    pub fn is_continuous(&self) -> bool {
        self.function.is_some()
    }
}

/// Large-modulus domain that inputs can be extracted from (ring dimension,
/// ciphertext modulus and the key-switching base bridging into the context).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionDomain {
    pub ring_dim: u32,
    pub modulus: u64,
    pub base_ks: u32,
}

pub trait LweInfos {
    /// Modulus the ciphertext currently lives in.
    fn modulus(&self) -> u64;
}
