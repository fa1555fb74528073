use crate::{
    api::{LweAddConst, LweDecrypt, LweEncryptSk},
    error::BackendError,
    layouts::{Freshness, LweInfos},
    reference::{ClearContext, add_signed, mod_switch},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearSecretKey {
    pub(crate) id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearCiphertext {
    pub(crate) phase: u64,
    pub(crate) modulus: u64,
    pub(crate) key: u64,
}

impl ClearCiphertext {
    /// Noisy phase `m * modulus / p + e` in `[0, modulus)`.
    pub fn phase(&self) -> u64 {
        self.phase
    }
}

impl LweInfos for ClearCiphertext {
    fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl LweEncryptSk for ClearContext {
    fn lwe_encrypt_sk(
        &mut self,
        sk: &ClearSecretKey,
        m: u64,
        freshness: Freshness,
        p: u64,
        modulus: Option<u64>,
    ) -> Result<ClearCiphertext, BackendError> {
        let modulus: u64 = modulus.unwrap_or(self.params.q);
        if p < 2 {
            return Err(BackendError::PlaintextModulus(p));
        }
        if modulus < p {
            return Err(BackendError::CiphertextModulus {
                modulus,
                reason: "smaller than the plaintext modulus",
            });
        }

        let mut phase: u64 = mod_switch(m % p, p, modulus);
        if freshness == Freshness::Fresh {
            let e: i64 = self.source.next_gaussian(self.params.std).round() as i64;
            phase = add_signed(phase, e, modulus);
        }

        Ok(ClearCiphertext {
            phase,
            modulus,
            key: sk.id,
        })
    }
}

impl LweDecrypt for ClearContext {
    fn lwe_decrypt(&self, sk: &ClearSecretKey, ct: &ClearCiphertext, p: u64) -> Result<u64, BackendError> {
        if sk.id != ct.key {
            return Err(BackendError::KeyMismatch);
        }
        if p < 2 {
            return Err(BackendError::PlaintextModulus(p));
        }
        Ok(mod_switch(ct.phase, ct.modulus, p))
    }
}

impl LweAddConst for ClearContext {
    fn lwe_add_const_inplace(&self, ct: &mut ClearCiphertext, c: u64) {
        ct.phase = ((ct.phase as u128 + c as u128) % ct.modulus as u128) as u64;
    }
}
