use std::{collections::BTreeSet, fmt, time::Duration};

use itertools::Itertools;

/// Largest absolute error an approximate evaluation may have and still pass.
pub const TOLERANCE: f64 = 0.1;

pub fn within_tolerance(diff: f64) -> bool {
    diff < TOLERANCE
}

/// One scored evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Trial {
    pub index: usize,
    /// Zero-based iteration the evaluation belongs to.
    pub depth: usize,
    /// Encoded plaintext fed into the first evaluation.
    pub input: u64,
    /// Real input under the approximate encoding.
    pub input_real: Option<f64>,
    pub observed: f64,
    pub expected: f64,
    pub diff: f64,
    pub passed: bool,
    pub elapsed: Duration,
}

/// Running sums of absolute errors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ErrorAccumulator {
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl ErrorAccumulator {
    pub fn push(&mut self, diff: f64) {
        self.count += 1;
        self.sum += diff;
        self.sum_sq += diff * diff;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Root mean square of the errors.
    pub fn rms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum_sq / self.count as f64).sqrt()
    }

    /// Population standard deviation of the errors.
    pub fn std(&self) -> f64 {
        let mean: f64 = self.mean();
        (self.rms().powi(2) - mean * mean).max(0.0).sqrt()
    }
}

/// Aggregate of a harness run.
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    pub desc: String,
    trials: usize,
    evaluations: usize,
    failures: BTreeSet<usize>,
    errors: Vec<ErrorAccumulator>,
    elapsed: Duration,
}

impl Statistics {
    pub fn new(desc: &str) -> Self {
        Statistics {
            desc: desc.to_string(),
            ..Default::default()
        }
    }

    /// Scores a trial; approximate trials (with a real input) also feed the error accumulators.
    pub fn record(&mut self, trial: &Trial) {
        self.record_outcome(trial.index, trial.passed, trial.elapsed);
        if trial.input_real.is_some() {
            self.record_error(trial.depth, trial.diff);
        }
    }

    pub fn record_outcome(&mut self, index: usize, passed: bool, elapsed: Duration) {
        self.trials = self.trials.max(index + 1);
        self.evaluations += 1;
        self.elapsed += elapsed;
        if !passed {
            self.failures.insert(index);
        }
    }

    pub fn record_error(&mut self, depth: usize, diff: f64) {
        if self.errors.len() <= depth {
            self.errors.resize(depth + 1, ErrorAccumulator::default());
        }
        self.errors[depth].push(diff);
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Indices of trials with at least one failing evaluation, ascending.
    pub fn failures(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures.iter().copied()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Error accumulators per evaluation depth; empty for discrete runs.
    pub fn depths(&self) -> &[ErrorAccumulator] {
        &self.errors
    }

    pub fn total_elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn mean_elapsed(&self) -> Duration {
        match u32::try_from(self.evaluations) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.elapsed / n,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.desc)?;
        for (depth, acc) in self.errors.iter().enumerate() {
            writeln!(
                f,
                "depth {depth}: mean error {:.6}, std {:.6}, rms {:.6}",
                acc.mean(),
                acc.std(),
                acc.rms()
            )?;
        }
        if self.passed() {
            writeln!(f, "all {} trials passed", self.trials)?;
        } else {
            writeln!(
                f,
                "{} of {} trials failed: {}",
                self.failures.len(),
                self.trials,
                self.failures.iter().join(", ")
            )?;
        }
        write!(f, "mean evaluation time: {:?}", self.mean_elapsed())
    }
}
