use tracing::trace;

use crate::{
    api::{EvalRelu, HomDecompose, MaxPlaintextSpace},
    error::BackendError,
    layouts::DecompositionKind,
    reference::{ClearCiphertext, ClearContext, check_base, mod_switch},
};

impl HomDecompose for ClearContext {
    fn eval_decomp(&self, kind: DecompositionKind, ct: &ClearCiphertext) -> Result<Vec<ClearCiphertext>, BackendError> {
        self.check_bootstrap(ct)?;

        if self.params.base_gs.is_empty() {
            return Err(BackendError::MissingMultiLevelBases("homomorphic decomposition"));
        }

        let digit_modulus: u64 = self.params.plaintext_modulus;
        if digit_modulus < 2 {
            return Err(BackendError::PlaintextModulus(digit_modulus));
        }

        let q: u64 = self.params.q;
        if ct.modulus > kind.modulus_ceiling() {
            return Err(BackendError::CiphertextModulus {
                modulus: ct.modulus,
                reason: "above the decomposition ceiling",
            });
        }
        if ct.modulus < q || ct.modulus % q != 0 {
            return Err(BackendError::CiphertextModulus {
                modulus: ct.modulus,
                reason: "not a multiple of q",
            });
        }

        let space: u64 = self.max_plaintext_space() * (ct.modulus / q);
        let mut value: u64 = mod_switch(ct.phase, ct.modulus, space);

        let mut digits: Vec<ClearCiphertext> = Vec::new();
        let mut remaining: u64 = space;
        while remaining > 1 {
            let cur_mod: u64 = remaining.min(digit_modulus);
            digits.push(ClearCiphertext {
                phase: mod_switch(value % cur_mod, cur_mod, q),
                modulus: q,
                key: ct.key,
            });
            value /= digit_modulus;
            remaining /= digit_modulus;
        }

        trace!(%kind, modulus = ct.modulus, digits = digits.len(), "decomposed");
        Ok(digits)
    }
}

impl EvalRelu for ClearContext {
    fn eval_relu(
        &self,
        ct: &ClearCiphertext,
        ct_msd: &ClearCiphertext,
        base_g_msd: u32,
        base_g_relu: u32,
    ) -> Result<ClearCiphertext, BackendError> {
        self.check_bootstrap(ct)?;
        self.check_bootstrap(ct_msd)?;
        check_base(base_g_msd)?;
        check_base(base_g_relu)?;

        let negative: bool = ct_msd.phase as u128 * 2 >= ct_msd.modulus as u128;
        Ok(ClearCiphertext {
            phase: if negative { 0 } else { ct.phase },
            modulus: ct.modulus,
            key: ct.key,
        })
    }
}
