use crate::{
    api::LweExtract,
    error::BackendError,
    layouts::ExtractionDomain,
    reference::{ClearCiphertext, ClearContext, ClearSecretKey, add_signed, check_base, mod_switch, next_key_id},
};

/// Secret key of the large domain together with the switching key into the context's key.
#[derive(Clone, Debug)]
pub struct ClearExtractionKey {
    id: u64,
    target: u64,
    domain: ExtractionDomain,
}

impl ClearExtractionKey {
    pub fn domain(&self) -> &ExtractionDomain {
        &self.domain
    }
}

impl LweExtract for ClearContext {
    type ExtractionKey = ClearExtractionKey;

    fn extraction_key_gen(&mut self, sk: &ClearSecretKey, domain: &ExtractionDomain) -> Result<ClearExtractionKey, BackendError> {
        if !domain.ring_dim.is_power_of_two() {
            return Err(BackendError::InvalidParameter {
                name: "extraction ring_dim",
                reason: "must be a power of two".to_string(),
            });
        }
        if !domain.modulus.is_power_of_two() || domain.modulus <= self.params.q_ks {
            return Err(BackendError::CiphertextModulus {
                modulus: domain.modulus,
                reason: "extraction modulus must be a power of two above q_ks",
            });
        }
        check_base(domain.base_ks)?;

        Ok(ClearExtractionKey {
            id: next_key_id(),
            target: sk.id,
            domain: *domain,
        })
    }

    fn extraction_encrypt(&mut self, key: &ClearExtractionKey, m: u64, p: u64) -> Result<ClearCiphertext, BackendError> {
        let modulus: u64 = key.domain.modulus;
        if p < 2 || p > modulus {
            return Err(BackendError::PlaintextModulus(p));
        }
        let e: i64 = self.source.next_gaussian(self.params.std).round() as i64;
        Ok(ClearCiphertext {
            phase: add_signed(mod_switch(m % p, p, modulus), e, modulus),
            modulus,
            key: key.id,
        })
    }

    fn extraction_decrypt(&self, key: &ClearExtractionKey, ct: &ClearCiphertext, p: u64) -> Result<u64, BackendError> {
        if ct.key != key.id {
            return Err(BackendError::KeyMismatch);
        }
        if p < 2 {
            return Err(BackendError::PlaintextModulus(p));
        }
        Ok(mod_switch(ct.phase, ct.modulus, p))
    }

    fn extraction_switch(&self, key: &ClearExtractionKey, ct: &ClearCiphertext) -> Result<ClearCiphertext, BackendError> {
        if ct.key != key.id {
            return Err(BackendError::KeyMismatch);
        }
        let q_ks: u64 = self.params.q_ks;
        let q: u64 = self.params.q;
        let phase_ks: u64 = mod_switch(ct.phase, ct.modulus, q_ks);
        Ok(ClearCiphertext {
            phase: mod_switch(phase_ks, q_ks, q),
            modulus: q,
            key: key.target,
        })
    }
}
