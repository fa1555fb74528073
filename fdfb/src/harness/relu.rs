use std::time::{Duration, Instant};

use binfhe::{BinFheScheme, DecompositionKind, EvalRelu, Freshness, HomDecompose, LweDecrypt, LweEncryptSk, LweInfos};
use sampling::Source;
use tracing::{debug, info, warn};

use super::{RunOptions, Statistics, Trial, within_tolerance};
use crate::{bases::LARGEST_MULTI_LEVEL_BASE, catalog::ReluConfiguration, encoding::decode, error::HarnessError, fixture::CachedContext};

/// Trials per ReLU run when none is requested.
pub const RELU_TRIALS: usize = 8;

/// ReLU through the sign of the most significant digit of a Reduce decomposition.
pub struct ReluHarness {
    trials: usize,
    source: Source,
}

impl ReluHarness {
    pub fn new(options: &RunOptions) -> Self {
        ReluHarness {
            trials: options.trials.unwrap_or(RELU_TRIALS),
            source: options.source(),
        }
    }

    pub fn run<B>(&mut self, cached: &mut CachedContext<B>, configuration: &ReluConfiguration) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + HomDecompose + EvalRelu,
    {
        self.run_with(cached, configuration, |_| {})
    }

    pub fn run_with<B, F>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &ReluConfiguration,
        mut observer: F,
    ) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + HomDecompose + EvalRelu,
        F: FnMut(&Trial),
    {
        if !configuration.is_discrete() && !(configuration.delta > 0.0) {
            return Err(HarnessError::invalid(&configuration.desc, "approximate ReLU needs a positive scale"));
        }
        let space: u64 = configuration.space();
        let q_in: u64 = configuration.q_in;

        let mut stats: Statistics = Statistics::new(&configuration.desc);
        for index in 0..self.trials {
            let m: u64 = self.source.next_u64_mod(space);

            let start: Instant = Instant::now();
            let ct: B::Ciphertext = cached
                .context
                .lwe_encrypt_sk(&cached.secret_key, m, Freshness::Fresh, space, Some(q_in))?;
            let digits: Vec<B::Ciphertext> = cached.context.eval_decomp(DecompositionKind::Reduce, &ct)?;
            let msd: &B::Ciphertext = digits
                .last()
                .ok_or_else(|| HarnessError::invalid(&configuration.desc, "decomposition produced no digits"))?;
            let ct_relu: B::Ciphertext =
                cached
                    .context
                    .eval_relu(&ct, msd, LARGEST_MULTI_LEVEL_BASE, configuration.relu_base_g)?;
            let elapsed: Duration = start.elapsed();

            let trial: Trial = if configuration.is_discrete() {
                let observed: u64 = cached.context.lwe_decrypt(&cached.secret_key, &ct_relu, space)?;
                let expected: u64 = if m >= space / 2 { 0 } else { m };
                Trial {
                    index,
                    depth: 0,
                    input: m,
                    input_real: None,
                    observed: observed as f64,
                    expected: expected as f64,
                    diff: observed.abs_diff(expected) as f64,
                    passed: observed == expected,
                    elapsed,
                }
            } else {
                let modulus: u64 = ct_relu.modulus();
                let res: u64 = cached.context.lwe_decrypt(&cached.secret_key, &ct_relu, modulus)?;
                let observed: f64 = decode(res, modulus, configuration.delta * modulus as f64 / q_in as f64);
                let x: f64 = decode(m, space, configuration.delta);
                let expected: f64 = x.max(0.0);
                let diff: f64 = (expected - observed).abs();
                Trial {
                    index,
                    depth: 0,
                    input: m,
                    input_real: Some(x),
                    observed,
                    expected,
                    diff,
                    passed: within_tolerance(diff),
                    elapsed,
                }
            };

            debug!(index, m, expected = trial.expected, observed = trial.observed, "relu trial");
            if !trial.passed {
                warn!(index, m, expected = trial.expected, observed = trial.observed, "relu trial failed");
            }
            stats.record(&trial);
            observer(&trial);
        }

        info!(
            desc = %configuration.desc,
            failures = stats.failure_count(),
            mean_elapsed = ?stats.mean_elapsed(),
            "relu finished"
        );
        Ok(stats)
    }
}
