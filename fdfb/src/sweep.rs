use std::thread;

use binfhe::{BinFheScheme, ContextGenerate, FuncEval, KeyGenerate, LweAddConst, LweDecrypt, LweEncryptSk, LweExtract};
use sampling::Source;
use tracing::info;

use crate::{
    catalog::{Catalog, Configuration},
    error::HarnessError,
    fixture::{CachedContext, ContextCache},
    harness::{PrecisionHarness, RunOptions, Statistics},
};

/// Result of one catalog entry in a sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    pub index: usize,
    pub result: Result<Statistics, HarnessError>,
}

impl SweepOutcome {
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(stats) if stats.passed())
    }
}

/// Runs the precision harness on every index of `indices`, split in
/// contiguous chunks over `threads` workers. Every worker owns its context
/// cache. Outcomes come back in the order of `indices`.
///
/// The harness of each index is seeded with `options.seed + index`.
pub fn sweep<B>(catalog: &Catalog, indices: &[usize], options: &RunOptions, threads: usize) -> Vec<SweepOutcome>
where
    B: BinFheScheme + ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    if indices.is_empty() {
        return Vec::new();
    }

    let threads: usize = threads.clamp(1, indices.len());
    let chunk_size: usize = indices.len().div_ceil(threads);
    info!(entries = indices.len(), threads, "sweep started");

    thread::scope(|scope| {
        let handles: Vec<thread::ScopedJoinHandle<'_, Vec<SweepOutcome>>> = indices
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut cache: ContextCache<B> = ContextCache::new(worker_seed(options.seed, chunk[0]));
                    chunk
                        .iter()
                        .map(|&index| SweepOutcome {
                            index,
                            result: run_entry(&mut cache, catalog, index, options),
                        })
                        .collect()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(outcomes) => outcomes,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}

fn worker_seed(seed: Option<u64>, first_index: usize) -> [u8; 32] {
    match seed {
        Some(seed) => Source::from_u64(seed ^ first_index as u64).new_seed(),
        None => sampling::new_seed(),
    }
}

fn run_entry<B>(cache: &mut ContextCache<B>, catalog: &Catalog, index: usize, options: &RunOptions) -> Result<Statistics, HarnessError>
where
    B: BinFheScheme + ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = catalog.get(index)?;
    let cached: &mut CachedContext<B> = cache.ensure(index, &configuration.context_params())?;
    let mut harness: PrecisionHarness = PrecisionHarness::new(RunOptions {
        seed: options.seed.map(|seed| seed.wrapping_add(index as u64)),
        ..options.clone()
    });
    let trials: usize = harness.trial_count(configuration);
    harness.run_trials(cached, configuration, trials)
}
