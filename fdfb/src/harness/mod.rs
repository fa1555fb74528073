//! Precision harnesses: drive a configuration through encrypt, evaluate and
//! decrypt cycles and score the outputs against the clear computation.

mod decomposition;
mod relu;
mod stats;

use std::time::{Duration, Instant};

use binfhe::{
    BinFheScheme, ExtractionDomain, Freshness, FuncEval, LweAddConst, LweDecrypt, LweEncryptSk, LweExtract, LweInfos,
};
use sampling::{Source, new_seed};
use tracing::{debug, info, warn};

pub use decomposition::{DecompositionHarness, DecompositionTrial};
pub use relu::ReluHarness;
pub use stats::{ErrorAccumulator, Statistics, TOLERANCE, Trial, within_tolerance};

use crate::{
    catalog::{Configuration, N25, N35, RealFunction},
    dispatch,
    encoding::{decode, encode, sweep_input},
    error::HarnessError,
    fixture::CachedContext,
};

/// Number of approximate-encoding trials when none is requested.
pub const CONTINUOUS_TRIALS: usize = 1000;

/// Ring dimension of the large domain extracted inputs come from.
pub const EXTRACTION_RING_DIM: u32 = 1 << 16;
/// Ciphertext modulus of the large domain extracted inputs come from.
pub const EXTRACTION_MODULUS: u64 = 1 << 55;

/// How approximate-encoding inputs are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InputMode {
    /// Evenly spaced reals across the input range.
    #[default]
    Sweep,
    /// Uniform plaintexts over the whole space.
    Uniform,
    /// The same real for every trial.
    Fixed(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Overrides the per-configuration default trial count.
    pub trials: Option<usize>,
    /// Evaluations chained on each input, each fed the previous output.
    pub eval_iterations: usize,
    pub input_mode: InputMode,
    /// Synthesizes approximate inputs in the large extraction domain.
    pub extracted: bool,
    /// Lookup table replacing the random one of discrete runs.
    pub lut: Option<Vec<u64>>,
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            trials: None,
            eval_iterations: 1,
            input_mode: InputMode::Sweep,
            extracted: false,
            lut: None,
            seed: None,
        }
    }
}

impl RunOptions {
    pub(crate) fn source(&self) -> Source {
        match self.seed {
            Some(seed) => Source::from_u64(seed),
            None => Source::new(new_seed()),
        }
    }
}

/// Large domain inputs are extracted from for a context of LWE dimension `n`.
pub fn extraction_domain(n: u32) -> Result<ExtractionDomain, HarnessError> {
    let base_ks: u32 = match n {
        N35 => 1 << 12,
        N25 => 1 << 5,
        _ => return Err(HarnessError::UnsupportedExtractionDimension(n)),
    };
    Ok(ExtractionDomain {
        ring_dim: EXTRACTION_RING_DIM,
        modulus: EXTRACTION_MODULUS,
        base_ks,
    })
}

pub struct PrecisionHarness {
    options: RunOptions,
    source: Source,
}

impl PrecisionHarness {
    pub fn new(options: RunOptions) -> Self {
        let source: Source = options.source();
        PrecisionHarness { options, source }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// `trials` from the options, else `p` for discrete and [`CONTINUOUS_TRIALS`] for approximate runs.
    pub fn trial_count(&self, configuration: &Configuration) -> usize {
        self.options.trials.unwrap_or(if configuration.is_discrete() {
            configuration.p as usize
        } else {
            CONTINUOUS_TRIALS
        })
    }

    pub fn run_trials<B>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &Configuration,
        trial_count: usize,
    ) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
    {
        self.run_trials_with(cached, configuration, trial_count, |_| {})
    }

    /// [`Self::run_trials`] calling `observer` with every scored evaluation.
    pub fn run_trials_with<B, F>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &Configuration,
        trial_count: usize,
        mut observer: F,
    ) -> Result<Statistics, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
        F: FnMut(&Trial),
    {
        configuration.validate()?;
        if self.options.eval_iterations == 0 {
            return Err(HarnessError::invalid(&configuration.desc, "at least one evaluation per trial is required"));
        }

        let mut stats: Statistics = Statistics::new(&configuration.desc);
        let mut record = |stats: &mut Statistics, trial: Trial| {
            debug!(
                index = trial.index,
                depth = trial.depth,
                expected = trial.expected,
                observed = trial.observed,
                diff = trial.diff,
                "trial"
            );
            if !trial.passed {
                warn!(index = trial.index, depth = trial.depth, expected = trial.expected, observed = trial.observed, "trial failed");
            }
            stats.record(&trial);
            observer(&trial);
        };

        if configuration.is_discrete() {
            let lut: Vec<u64> = self.lookup_table(configuration)?;
            for index in 0..trial_count {
                self.discrete_trial(cached, configuration, &lut, index)?
                    .into_iter()
                    .for_each(|trial| record(&mut stats, trial));
            }
        } else {
            let function: RealFunction = configuration
                .function
                .ok_or_else(|| HarnessError::invalid(&configuration.desc, "an approximate configuration needs a function"))?;
            let input: ContinuousInput<B> = ContinuousInput::new(cached, configuration, self.options.extracted)?;
            for index in 0..trial_count {
                self.continuous_trial(cached, configuration, function, &input, index, trial_count)?
                    .into_iter()
                    .for_each(|trial| record(&mut stats, trial));
            }
        }

        info!(
            desc = %configuration.desc,
            algorithm = %configuration.algorithm,
            trials = stats.trials(),
            failures = stats.failure_count(),
            mean_elapsed = ?stats.mean_elapsed(),
            "run finished"
        );
        Ok(stats)
    }

    /// Supplied tables are reduced mod `p`; otherwise entries are drawn uniformly.
    fn lookup_table(&mut self, configuration: &Configuration) -> Result<Vec<u64>, HarnessError> {
        let p: u64 = configuration.p;
        match &self.options.lut {
            Some(lut) if lut.len() as u64 != p => Err(HarnessError::invalid(
                &configuration.desc,
                format!("lookup table has {} entries, expected {p}", lut.len()),
            )),
            Some(lut) => Ok(lut.iter().map(|x| x % p).collect()),
            None => Ok((0..p).map(|_| self.source.next_u64_mod(p)).collect()),
        }
    }

    fn discrete_trial<B>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &Configuration,
        lut: &[u64],
        index: usize,
    ) -> Result<Vec<Trial>, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + FuncEval,
    {
        let p: u64 = configuration.p;
        let m: u64 = match self.options.input_mode {
            InputMode::Sweep => index as u64 % p,
            InputMode::Uniform => self.source.next_u64_mod(p),
            InputMode::Fixed(x) => (x.round() as i64).rem_euclid(p as i64) as u64,
        };

        let mut ct: B::Ciphertext = cached
            .context
            .lwe_encrypt_sk(&cached.secret_key, m, Freshness::Fresh, p, None)?;
        let mut expected: u64 = m;
        let mut trials: Vec<Trial> = Vec::with_capacity(self.options.eval_iterations);
        for depth in 0..self.options.eval_iterations {
            let (ct_f, elapsed) = timed(|| dispatch::evaluate(&cached.context, &ct, configuration, lut))?;
            expected = lut[expected as usize];
            let observed: u64 = cached.context.lwe_decrypt(&cached.secret_key, &ct_f, p)?;
            trials.push(Trial {
                index,
                depth,
                input: m,
                input_real: None,
                observed: observed as f64,
                expected: expected as f64,
                diff: observed.abs_diff(expected) as f64,
                passed: observed == expected,
                elapsed,
            });
            ct = ct_f;
        }
        Ok(trials)
    }

    fn continuous_trial<B>(
        &mut self,
        cached: &mut CachedContext<B>,
        configuration: &Configuration,
        function: RealFunction,
        input: &ContinuousInput<B>,
        index: usize,
        trial_count: usize,
    ) -> Result<Vec<Trial>, HarnessError>
    where
        B: BinFheScheme + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
    {
        let space: u64 = input.space;
        let m: u64 = match self.options.input_mode {
            InputMode::Sweep => encode(sweep_input(index, trial_count, input.bound), input.delta_in, space),
            InputMode::Uniform => self.source.next_u64_mod(space),
            InputMode::Fixed(x) => encode(x, input.delta_in, space),
        };
        let x: f64 = decode(m, space, input.delta_in);

        let mut ct: B::Ciphertext = input.encrypt_exact(cached, m)?;
        let mut trials: Vec<Trial> = Vec::with_capacity(self.options.eval_iterations);
        for depth in 0..self.options.eval_iterations {
            let (ct_f, elapsed) = timed(|| dispatch::evaluate(&cached.context, &ct, configuration, &[]))?;
            let modulus: u64 = ct_f.modulus();
            let res: u64 = cached.context.lwe_decrypt(&cached.secret_key, &ct_f, modulus)?;
            let observed: f64 = decode(res, modulus, configuration.delta_out);
            let expected: f64 = function.iterate(x, depth + 1);
            let diff: f64 = (expected - observed).abs();
            trials.push(Trial {
                index,
                depth,
                input: m,
                input_real: Some(x),
                observed,
                expected,
                diff,
                passed: within_tolerance(diff),
                elapsed,
            });
            ct = ct_f;
        }
        Ok(trials)
    }
}

/// Where approximate inputs are encrypted: directly in the context or in the
/// large extraction domain followed by the switch into the context.
struct ContinuousInput<B: LweExtract> {
    space: u64,
    delta_in: f64,
    bound: f64,
    extraction_key: Option<B::ExtractionKey>,
}

impl<B> ContinuousInput<B>
where
    B: BinFheScheme + LweEncryptSk + LweDecrypt + LweAddConst + LweExtract,
{
    fn new(cached: &mut CachedContext<B>, configuration: &Configuration, extracted: bool) -> Result<Self, HarnessError> {
        let q: u64 = configuration.params.q;
        let bound: f64 = q as f64 / configuration.delta_in / 2.0;
        if !extracted {
            return Ok(ContinuousInput {
                space: q,
                delta_in: configuration.delta_in,
                bound,
                extraction_key: None,
            });
        }
        let domain: ExtractionDomain = extraction_domain(configuration.params.n)?;
        let key: B::ExtractionKey = cached.context.extraction_key_gen(&cached.secret_key, &domain)?;
        Ok(ContinuousInput {
            space: domain.modulus,
            delta_in: configuration.delta_in * domain.modulus as f64 / q as f64,
            bound,
            extraction_key: Some(key),
        })
    }

    /// Encrypts `m` and cancels the encryption noise, so the evaluation sees exactly `m`.
    fn encrypt_exact(&self, cached: &mut CachedContext<B>, m: u64) -> Result<B::Ciphertext, HarnessError> {
        let space: u64 = self.space;
        let context: &mut B = &mut cached.context;
        match &self.extraction_key {
            None => {
                let mut ct: B::Ciphertext = context.lwe_encrypt_sk(&cached.secret_key, m, Freshness::Fresh, space, None)?;
                let dec: u64 = context.lwe_decrypt(&cached.secret_key, &ct, space)?;
                let delta = correction(m, dec, space, ct.modulus());
                context.lwe_add_const_inplace(&mut ct, delta);
                Ok(ct)
            }
            Some(key) => {
                let mut ct: B::Ciphertext = context.extraction_encrypt(key, m, space)?;
                let dec: u64 = context.extraction_decrypt(key, &ct, space)?;
                let delta = correction(m, dec, space, ct.modulus());
                context.lwe_add_const_inplace(&mut ct, delta);
                Ok(context.extraction_switch(key, &ct)?)
            }
        }
    }
}

/// `(m - dec) mod space`, scaled onto a ciphertext of modulus `modulus`.
fn correction(m: u64, dec: u64, space: u64, modulus: u64) -> u64 {
    let diff: u128 = ((m as u128 + space as u128 - dec as u128 % space as u128) % space as u128) * (modulus as u128 / space as u128);
    (diff % modulus as u128) as u64
}

fn timed<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<(T, Duration), E> {
    let start: Instant = Instant::now();
    let out: T = f()?;
    Ok((out, start.elapsed()))
}
