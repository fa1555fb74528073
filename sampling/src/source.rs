use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use rand_core::RngCore;
use rand_distr::{Distribution, Normal};

/// Seedable randomness source shared by key generation, noise sampling and
/// test-input generation.
pub struct Source {
    source: ChaCha8Rng,
}

/// Draws a fresh seed from the thread-local entropy pool.
pub fn new_seed() -> [u8; 32] {
    let mut seed: [u8; 32] = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Expands a `u64` into a full seed, so that user-facing seeds stay short.
    pub fn from_u64(seed: u64) -> Source {
        Source {
            source: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Uniform sample in `[0, modulus)`. Moduli of 0 and 1 yield 0.
    #[inline(always)]
    pub fn next_u64_mod(&mut self, modulus: u64) -> u64 {
        if modulus <= 1 {
            return 0;
        }
        let mask: u64 = u64::MAX >> (modulus - 1).leading_zeros();
        self.next_u64n(modulus, mask)
    }

    /// Centered normal sample with standard deviation `sigma`.
    /// A non-positive or non-finite `sigma` samples the constant 0.
    pub fn next_gaussian(&mut self, sigma: f64) -> f64 {
        if !(sigma.is_finite() && sigma > 0.0) {
            return 0.0;
        }
        match Normal::new(0.0, sigma) {
            Ok(normal) => normal.sample(self),
            Err(_) => 0.0,
        }
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}
