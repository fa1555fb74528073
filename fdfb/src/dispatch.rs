//! Routing of a configuration to the backend evaluation call of its algorithm.

use std::{fmt, str::FromStr};

use binfhe::{BinFheScheme, FuncEncoding, FuncEval};

use crate::{bases::LARGEST_MULTI_LEVEL_BASE, catalog::Configuration, error::HarnessError};

/// Evaluation strategy of a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    BasicEval,
    Compress,
    CancelSign,
    Select,
    PreSelect,
    SelectAlt,
    Compare,
    WoBootstrap1,
    WoBootstrap2,
    ProductEval,
    DecompositionEval,
}

impl Algorithm {
    pub const ALL: [Algorithm; 11] = [
        Algorithm::BasicEval,
        Algorithm::Compress,
        Algorithm::CancelSign,
        Algorithm::Select,
        Algorithm::PreSelect,
        Algorithm::SelectAlt,
        Algorithm::Compare,
        Algorithm::WoBootstrap1,
        Algorithm::WoBootstrap2,
        Algorithm::ProductEval,
        Algorithm::DecompositionEval,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::BasicEval => "basic-eval",
            Algorithm::Compress => "compress",
            Algorithm::CancelSign => "cancel-sign",
            Algorithm::Select => "select",
            Algorithm::PreSelect => "pre-select",
            Algorithm::SelectAlt => "select-alt",
            Algorithm::Compare => "compare",
            Algorithm::WoBootstrap1 => "wo-bootstrap-1",
            Algorithm::WoBootstrap2 => "wo-bootstrap-2",
            Algorithm::ProductEval => "product-eval",
            Algorithm::DecompositionEval => "decomposition-eval",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.tag() == s)
            .ok_or_else(|| HarnessError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Gadget base for the final bootstrap of the select-style variants.
pub fn select_base(configuration: &Configuration) -> u32 {
    if configuration.params.base_gs.is_empty() {
        configuration.params.base_g
    } else {
        LARGEST_MULTI_LEVEL_BASE
    }
}

/// `(odd, shift)` arguments of the compare variant.
pub fn compare_symmetry(configuration: &Configuration) -> (bool, f64) {
    let odd: bool = configuration.extra > 0;
    let shift: f64 = match (odd, configuration.function) {
        (true, Some(function)) => function.odd_symmetry_offset(),
        _ => 0.0,
    };
    (odd, shift)
}

/// Issues the evaluation call of `configuration`'s algorithm on `ct`.
/// `lut` is ignored by the backend for approximate configurations.
pub fn evaluate<B>(context: &B, ct: &B::Ciphertext, configuration: &Configuration, lut: &[u64]) -> Result<B::Ciphertext, HarnessError>
where
    B: BinFheScheme + FuncEval,
{
    let enc: FuncEncoding = configuration.encoding();
    let result = match configuration.algorithm {
        Algorithm::BasicEval => context.eval_func(ct, lut, &enc),
        Algorithm::Compress => context.eval_func_compress(ct, lut, &enc),
        Algorithm::CancelSign => context.eval_func_cancel_sign(ct, lut, &enc),
        Algorithm::Select => context.eval_func_select(ct, lut, &enc, select_base(configuration)),
        Algorithm::PreSelect => context.eval_func_pre_select(ct, lut, &enc, configuration.extra),
        Algorithm::SelectAlt => context.eval_func_select_alt(ct, lut, &enc, select_base(configuration)),
        Algorithm::Compare => {
            let (odd, shift) = compare_symmetry(configuration);
            context.eval_func_compare(ct, lut, &enc, odd, shift, select_base(configuration))
        }
        Algorithm::WoBootstrap1 => context.eval_func_wo_pbs1(ct, lut, &enc),
        Algorithm::WoBootstrap2 => context.eval_func_wo_pbs2(ct, lut, &enc),
        Algorithm::ProductEval => context.eval_func_bfv(ct, lut, &enc),
        Algorithm::DecompositionEval => context.eval_func_ks21(ct, lut, &enc),
    };
    Ok(result?)
}
