//! Subcommand implementations. Each returns whether every trial passed.

use anyhow::Context;
use binfhe::reference::ClearContext;
use fdfb::{
    CachedContext, Catalog, Configuration, ContextCache, DecompositionConfiguration, DecompositionHarness, PrecisionHarness,
    ReluConfiguration, ReluHarness, RunOptions, Statistics, Trial,
    catalog::{decomposition_catalog, relu_catalog},
    harness::DecompositionTrial,
    sweep,
};
use sampling::Source;

/// Settings shared by every subcommand.
pub struct Session {
    pub catalog: Catalog,
    pub options: RunOptions,
    pub threads: usize,
    pub quiet: bool,
}

impl Session {
    fn context_seed(&self) -> [u8; 32] {
        match self.options.seed {
            Some(seed) => Source::from_u64(seed).new_seed(),
            None => sampling::new_seed(),
        }
    }

    pub fn list(&self) -> bool {
        print!("{}", self.catalog);
        println!("{:*^100}", " decomposition ");
        decomposition_catalog()
            .iter()
            .enumerate()
            .for_each(|(i, c)| println!("{i}: {}", c.desc));
        println!("{:*^100}", " relu ");
        relu_catalog().iter().enumerate().for_each(|(i, c)| println!("{i}: {}", c.desc));
        true
    }

    pub fn eval(&self, index: usize) -> anyhow::Result<bool> {
        let configuration: &Configuration = self.catalog.get(index)?;
        println!("{index}: {}", configuration.desc);

        let mut cache: ContextCache<ClearContext> = ContextCache::new(self.context_seed());
        let cached: &mut CachedContext<ClearContext> = cache
            .ensure(index, &configuration.context_params())
            .with_context(|| format!("generating the context of entry {index}"))?;

        let mut harness: PrecisionHarness = PrecisionHarness::new(self.options.clone());
        let trials: usize = harness.trial_count(configuration);
        let stats: Statistics = harness.run_trials_with(cached, configuration, trials, |t| {
            if !self.quiet {
                print_trial(t)
            }
        })?;
        println!("{stats}");
        Ok(stats.passed())
    }

    pub fn decomp(&self, index: usize, log_q_in: u32) -> anyhow::Result<bool> {
        let configuration: &DecompositionConfiguration = DecompositionConfiguration::get(index)?;
        let q_in: u64 = 1u64
            .checked_shl(log_q_in)
            .with_context(|| format!("2^{log_q_in} does not fit an input modulus"))?;
        println!("{}, q_in = 2^{log_q_in}", configuration.desc);

        let params = DecompositionHarness::context_params(configuration, q_in)?;
        let mut cache: ContextCache<ClearContext, (usize, u32)> = ContextCache::new(self.context_seed());
        let cached: &mut CachedContext<ClearContext> = cache.ensure((index, log_q_in), &params)?;

        let stats: Statistics = DecompositionHarness::new(&self.options).run_with(cached, configuration, q_in, |t| {
            if !self.quiet {
                print_decomposition_trial(t)
            }
        })?;
        println!("{stats}");
        Ok(stats.passed())
    }

    pub fn relu(&self, index: usize) -> anyhow::Result<bool> {
        let configuration: &ReluConfiguration = ReluConfiguration::get(index)?;
        println!("{index}: {}", configuration.desc);

        let mut cache: ContextCache<ClearContext> = ContextCache::new(self.context_seed());
        let cached: &mut CachedContext<ClearContext> = cache.ensure(index, &configuration.context_params())?;

        let stats: Statistics = ReluHarness::new(&self.options).run_with(cached, configuration, |t| {
            if !self.quiet {
                print_trial(t)
            }
        })?;
        println!("{stats}");
        Ok(stats.passed())
    }

    pub fn sweep(&self, from: usize, to: usize) -> anyhow::Result<bool> {
        anyhow::ensure!(from <= to, "empty range {from}..={to}");
        let indices: Vec<usize> = (from..=to).collect();
        let outcomes = sweep::<ClearContext>(&self.catalog, &indices, &self.options, self.threads);

        let mut passed: bool = true;
        for outcome in outcomes {
            match outcome.result {
                Ok(stats) => {
                    println!("{}: {stats}", outcome.index);
                    passed &= stats.passed();
                }
                Err(e) => return Err(e).with_context(|| format!("entry {}", outcome.index)),
            }
        }
        Ok(passed)
    }
}

fn print_trial(trial: &Trial) {
    let verdict: &str = if trial.passed { "" } else { " FAILED" };
    match trial.input_real {
        Some(x) => println!(
            "[{}/{}] input {x:.6}, expected {:.6}, evaluated {:.6}, diff {:.6}, {:?}{verdict}",
            trial.index, trial.depth, trial.expected, trial.observed, trial.diff, trial.elapsed
        ),
        None => println!(
            "[{}/{}] input {}, expected {}, evaluated {}, {:?}{verdict}",
            trial.index, trial.depth, trial.input, trial.expected, trial.observed, trial.elapsed
        ),
    }
}

fn print_decomposition_trial(trial: &DecompositionTrial) {
    let verdict: &str = if trial.passed { "" } else { " FAILED" };
    let digits: Vec<String> = trial.digits.iter().map(|(e, o)| format!("{o}/{e}")).collect();
    println!("[{}] input {}, digits (evaluated/expected) {}{verdict}", trial.index, trial.input, digits.join(" "));
}
