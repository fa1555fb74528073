//! Reuse of an expensive context + key pair across runs of the same configuration.

use std::fmt::Debug;

use binfhe::{BinFheScheme, BootstrapMethod, ContextGenerate, KeyGenerate, SchemeParams};
use sampling::Source;
use tracing::info;

use crate::error::HarnessError;

pub struct CachedContext<B: BinFheScheme> {
    pub context: B,
    pub secret_key: B::SecretKey,
}

/// Holds at most one generated context, tagged with the key it was built for.
pub struct ContextCache<B: BinFheScheme, K = usize> {
    current: Option<(K, CachedContext<B>)>,
    generation: u64,
    source: Source,
}

impl<B, K> ContextCache<B, K>
where
    B: ContextGenerate + KeyGenerate,
    K: PartialEq + Debug,
{
    /// Contexts built by this cache derive their randomness from `seed`.
    pub fn new(seed: [u8; 32]) -> Self {
        ContextCache {
            current: None,
            generation: 0,
            source: Source::new(seed),
        }
    }

    /// Returns the cached pair when it was built for `key`, otherwise
    /// generates a new context from `params` with GINX bootstrapping,
    /// a fresh secret key and its bootstrapping keys.
    pub fn ensure(&mut self, key: K, params: &SchemeParams) -> Result<&mut CachedContext<B>, HarnessError> {
        let entry: (K, CachedContext<B>) = match self.current.take() {
            Some(entry) if entry.0 == key => entry,
            _ => {
                let mut context: B = B::generate(params, BootstrapMethod::Ginx, self.source.new_seed())?;
                let secret_key: B::SecretKey = context.key_gen()?;
                context.bootstrap_key_gen(&secret_key)?;
                self.generation += 1;
                info!(?key, generation = self.generation, n = params.n, q = params.q, "generated context");
                (key, CachedContext { context, secret_key })
            }
        };
        Ok(&mut self.current.insert(entry).1)
    }

    /// Number of contexts generated so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref().map(|(key, _)| key)
    }
}
