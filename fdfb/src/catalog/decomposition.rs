use std::sync::LazyLock;

use binfhe::{DecompositionKind, PublicKeyMode, SchemeParams};

use super::{N35, Q53, lookup};
use crate::error::HarnessError;

/// Shared LWE setup of the decomposition and ReLU configurations.
fn base_params(beta_precise: u32) -> SchemeParams {
    SchemeParams::new(N35, 1 << 11, 1 << 12, Q53, 1 << 35, 3.19, 1 << 5, 0, beta_precise)
}

/// A digit-decomposition run: `kind` splits large-modulus inputs into base-`p` digits.
/// The gadget bases are not fixed here but chosen per input modulus.
#[derive(Clone, Debug)]
pub struct DecompositionConfiguration {
    pub desc: String,
    pub kind: DecompositionKind,
    pub p: u64,
    pub params: SchemeParams,
}

/// A ReLU run on a large-modulus input.
///
/// `p_large` is the discrete input space; 0 selects the approximate encoding
/// with scale `delta` over the full input modulus `q_in`.
#[derive(Clone, Debug)]
pub struct ReluConfiguration {
    pub desc: String,
    pub q_in: u64,
    pub p_large: u64,
    pub p: u64,
    pub relu_base_g: u32,
    pub delta: f64,
    pub params: SchemeParams,
}

impl ReluConfiguration {
    pub fn is_discrete(&self) -> bool {
        self.p_large > 0
    }

    /// Plaintext space inputs are drawn from.
    pub fn space(&self) -> u64 {
        if self.is_discrete() { self.p_large } else { self.q_in }
    }

    pub fn context_params(&self) -> SchemeParams {
        self.params.clone().with_plaintext_modulus(self.p)
    }
}

static DECOMPOSITION: LazyLock<Vec<DecompositionConfiguration>> = LazyLock::new(|| {
    [
        (DecompositionKind::HomFloor, 16),
        (DecompositionKind::HomFloorAlt, 32),
        (DecompositionKind::Reduce, 16),
        (DecompositionKind::Compress, 32),
    ]
    .into_iter()
    .map(|(kind, p)| DecompositionConfiguration {
        desc: format!("decomposition using {kind}"),
        kind,
        p,
        params: base_params(55),
    })
    .collect()
});

static RELU: LazyLock<Vec<ReluConfiguration>> = LazyLock::new(|| {
    let two_levels: Vec<u32> = vec![1 << 18, 1 << 27];
    let three_levels: Vec<u32> = vec![1 << 14, 1 << 18, 1 << 27];
    [
        (1u64 << 10, 16, 1u32 << 27, &two_levels),
        (1 << 18, 16, 1 << 18, &two_levels),
        (1 << 22, 16, 1 << 14, &three_levels),
        (0, 32, 1 << 27, &two_levels),
        (0, 32, 1 << 18, &two_levels),
        (0, 32, 1 << 14, &three_levels),
    ]
    .into_iter()
    .map(|(p_large, p, relu_base_g, base_gs)| {
        let desc: String = if p_large > 0 {
            format!(
                "ReLU with {}, p = 2^{}, Bg = 2^{}",
                DecompositionKind::Reduce,
                p_large.trailing_zeros(),
                relu_base_g.trailing_zeros()
            )
        } else {
            format!("ReLU with {}, approximate, Bg = 2^{}", DecompositionKind::Reduce, relu_base_g.trailing_zeros())
        };
        ReluConfiguration {
            desc,
            q_in: 1 << 28,
            p_large,
            p,
            relu_base_g,
            delta: if p_large > 0 { 0.0 } else { (1u64 << 24) as f64 },
            params: base_params(56)
                .with_base_g(1 << 18)
                .with_base_gs(base_gs.clone())
                .with_public_key(1 << 5, 1 << 35, PublicKeyMode::HalfTrans),
        }
    })
    .collect()
});

pub fn decomposition_catalog() -> &'static [DecompositionConfiguration] {
    &DECOMPOSITION
}

pub fn relu_catalog() -> &'static [ReluConfiguration] {
    &RELU
}

impl DecompositionConfiguration {
    pub fn get(index: usize) -> Result<&'static DecompositionConfiguration, HarnessError> {
        lookup(decomposition_catalog(), index)
    }
}

impl ReluConfiguration {
    pub fn get(index: usize) -> Result<&'static ReluConfiguration, HarnessError> {
        lookup(relu_catalog(), index)
    }
}
