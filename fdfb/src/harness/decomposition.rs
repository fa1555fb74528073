use std::time::Instant;

use binfhe::{BinFheScheme, Freshness, HomDecompose, LweDecrypt, LweEncryptSk, MaxPlaintextSpace, SchemeParams};
use sampling::Source;
use tracing::{debug, info, warn};

use super::{RunOptions, Statistics};
use crate::{
    bases::select_bases, catalog::DecompositionConfiguration, error::HarnessError, fixture::CachedContext,
};

/// Trials per decomposition run when none is requested.
pub const DECOMPOSITION_TRIALS: usize = 8;

/// One decomposed input with the per-digit outcome, least significant digit first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompositionTrial {
    pub index: usize,
    pub input: u64,
    /// `(expected, observed)` for every digit that was checked.
    pub digits: Vec<(u64, u64)>,
    pub expected_digits: usize,
    pub passed: bool,
}

pub struct DecompositionHarness {
    trials: usize,
    source: Source,
}

impl DecompositionHarness {
    pub fn new(options: &RunOptions) -> Self {
        DecompositionHarness {
            trials: options.trials.unwrap_or(DECOMPOSITION_TRIALS),
            source: options.source(),
        }
    }

    /// Parameters of the context decomposing inputs of modulus `q_in`: the
    /// per-level bases come from the base table, the first of them also
    /// serves as the regular gadget base.
    pub fn context_params(configuration: &DecompositionConfiguration, q_in: u64) -> Result<SchemeParams, HarnessError> {
        let bases: Vec<u32> = select_bases(configuration.kind, q_in)?;
        Ok(configuration
            .params
            .clone()
            .with_base_g(bases[0])
            .with_base_gs(bases)
            .with_plaintext_modulus(configuration.p))
    }

    pub fn run<B>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &DecompositionConfiguration,
        q_in: u64,
    ) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
    {
        self.run_with(cached, configuration, q_in, |_| {})
    }

    pub fn run_with<B, F>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &DecompositionConfiguration,
        q_in: u64,
        mut observer: F,
    ) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
        F: FnMut(&DecompositionTrial),
    {
        let q: u64 = configuration.params.q;
        let p: u64 = configuration.p;
        if p < 2 {
            return Err(HarnessError::invalid(&configuration.desc, "digit modulus must be at least 2"));
        }
        if q_in < q || q_in % q != 0 {
            return Err(HarnessError::invalid(
                &configuration.desc,
                format!("input modulus {q_in} is not a multiple of q = {q}"),
            ));
        }
        let p_large: u64 = cached.context.max_plaintext_space() * (q_in / q);
        let expected_digits: usize = digit_moduli(p_large, p).len();

        let mut stats: Statistics = Statistics::new(&configuration.desc);
        for index in 0..self.trials {
            let m: u64 = self.source.next_u64_mod(p_large);
            let ct: B::Ciphertext = cached
                .context
                .lwe_encrypt_sk(&cached.secret_key, m, Freshness::Fresh, p_large, Some(q_in))?;

            let start: Instant = Instant::now();
            let digits: Vec<B::Ciphertext> = cached.context.eval_decomp(configuration.kind, &ct)?;
            let elapsed = start.elapsed();

            let mut rest: u64 = m;
            let mut checked: Vec<(u64, u64)> = Vec::with_capacity(digits.len());
            for (digit, cur) in digits.iter().zip(digit_moduli(p_large, p)) {
                let observed: u64 = cached.context.lwe_decrypt(&cached.secret_key, digit, cur)?;
                checked.push((rest % cur, observed));
                rest /= p;
            }

            let passed: bool = digits.len() == expected_digits && checked.iter().all(|(e, o)| e == o);
            debug!(index, m, digits = digits.len(), passed, "decomposition trial");
            if !passed {
                warn!(index, m, ?checked, got = digits.len(), expected = expected_digits, "decomposition trial failed");
            }
            stats.record_outcome(index, passed, elapsed);
            observer(&DecompositionTrial {
                index,
                input: m,
                digits: checked,
                expected_digits,
                passed,
            });
        }

        info!(
            desc = %configuration.desc,
            q_in,
            p_large,
            failures = stats.failure_count(),
            mean_elapsed = ?stats.mean_elapsed(),
            "decomposition finished"
        );
        Ok(stats)
    }
}

/// Modulus of every digit of a `space` decomposition in base `p`: `p` for all
/// but possibly the last one, which takes whatever space remains.
pub fn digit_moduli(space: u64, p: u64) -> Vec<u64> {
    let mut moduli: Vec<u64> = Vec::new();
    let mut j: u64 = space;
    while j > 1 {
        moduli.push(j.min(p));
        j /= p;
    }
    moduli
}
