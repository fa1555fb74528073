//! Gadget-base selection for homomorphic digit decomposition.
//!
//! A larger input modulus needs more decomposition levels with smaller bases
//! to keep the accumulated noise below the bootstrapping bound. Each kind has
//! a hard modulus ceiling above which no base list is safe.

use binfhe::DecompositionKind;

use crate::error::HarnessError;

/// Largest multi-level gadget base, used for the final bootstrap of multi-value variants.
pub const LARGEST_MULTI_LEVEL_BASE: u32 = 1 << 27;

const THREE_LEVELS: &[u32] = &[1 << 14, 1 << 18, 1 << 27];
const TWO_LEVELS: &[u32] = &[1 << 18, 1 << 27];
const ONE_LEVEL: &[u32] = &[1 << 27];

/// Ordered tiers of `(modulus lower bound, bases)`, sorted by descending bound.
/// The first tier whose bound the modulus reaches wins; `fallback` applies below all of them.
#[derive(Clone, Copy, Debug)]
pub struct BaseTable {
    pub kind: DecompositionKind,
    pub ceiling: u64,
    pub tiers: [(u64, &'static [u32]); 2],
    pub fallback: &'static [u32],
}

impl BaseTable {
    pub fn of(kind: DecompositionKind) -> Self {
        let (high, mid): (u64, u64) = match kind {
            DecompositionKind::HomFloor => (1 << 26, 1 << 17),
            DecompositionKind::HomFloorAlt => (1 << 28, 1 << 20),
            DecompositionKind::Reduce => (1 << 29, 1 << 20),
            DecompositionKind::Compress => (1 << 30, 1 << 21),
        };
        BaseTable {
            kind,
            ceiling: kind.modulus_ceiling(),
            tiers: [(high, THREE_LEVELS), (mid, TWO_LEVELS)],
            fallback: ONE_LEVEL,
        }
    }

    pub fn select(&self, q_in: u64) -> Result<&'static [u32], HarnessError> {
        if q_in > self.ceiling {
            return Err(HarnessError::ModulusTooLarge {
                kind: self.kind,
                modulus: q_in,
                ceiling: self.ceiling,
            });
        }
        Ok(self
            .tiers
            .iter()
            .find(|(bound, _)| q_in >= *bound)
            .map(|(_, bases)| *bases)
            .unwrap_or(self.fallback))
    }
}

/// Digit bases for decomposing a ciphertext of modulus `q_in`; element 0 is the first-level base.
pub fn select_bases(kind: DecompositionKind, q_in: u64) -> Result<Vec<u32>, HarnessError> {
    BaseTable::of(kind).select(q_in).map(<[u32]>::to_vec)
}

/// [`select_bases`] for `q_in = 2^log_q_in`.
pub fn select_bases_log2(kind: DecompositionKind, log_q_in: u32) -> Result<Vec<u32>, HarnessError> {
    let q_in: u64 = 1u64.checked_shl(log_q_in).ok_or(HarnessError::ModulusTooLarge {
        kind,
        modulus: u64::MAX,
        ceiling: kind.modulus_ceiling(),
    })?;
    select_bases(kind, q_in)
}
