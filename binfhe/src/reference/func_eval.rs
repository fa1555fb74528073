use crate::{
    api::FuncEval,
    error::BackendError,
    layouts::FuncEncoding,
    reference::{ClearCiphertext, ClearContext, centered, check_base, mod_switch},
};

impl ClearContext {
    /// Functional bootstrap shared by every variant: a table lookup for
    /// discrete contexts, `f(x)` (optionally mirrored around `odd_shift`) for
    /// approximate ones.
    fn bootstrap(
        &self,
        ct: &ClearCiphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        odd_shift: Option<f64>,
    ) -> Result<ClearCiphertext, BackendError> {
        self.check_bootstrap(ct)?;

        let q: u64 = self.params.q;
        let p: u64 = self.params.plaintext_modulus;

        if p > 0 {
            if lut.len() as u64 != p {
                return Err(BackendError::LutSize {
                    expected: p,
                    got: lut.len(),
                });
            }
            let m: usize = mod_switch(ct.phase, ct.modulus, p) as usize;
            return Ok(ClearCiphertext {
                phase: mod_switch(lut[m] % p, p, q),
                modulus: q,
                key: ct.key,
            });
        }

        let f: fn(f64) -> f64 = enc.function.ok_or(BackendError::MissingEncoding)?;
        if !(enc.delta_in > 0.0 && enc.delta_out > 0.0 && enc.q_out >= 2) {
            return Err(BackendError::MissingEncoding);
        }

        let x: f64 = centered(mod_switch(ct.phase, ct.modulus, q), q) as f64 / enc.delta_in;
        let y: f64 = match odd_shift {
            Some(shift) => x.signum() * (f(x.abs()) - shift) + shift,
            None => f(x),
        };
        let out: i128 = (y * enc.delta_out).round() as i128;

        Ok(ClearCiphertext {
            phase: out.rem_euclid(enc.q_out as i128) as u64,
            modulus: enc.q_out,
            key: ct.key,
        })
    }

    fn require_aux_modulus(&self, variant: &'static str) -> Result<(), BackendError> {
        if self.params.aux_modulus == 0 {
            return Err(BackendError::MissingAuxModulus(variant));
        }
        Ok(())
    }
}

impl FuncEval for ClearContext {
    fn eval_func(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_compress(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_cancel_sign(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_select(
        &self,
        ct: &ClearCiphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        base_g: u32,
    ) -> Result<ClearCiphertext, BackendError> {
        check_base(base_g)?;
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_pre_select(
        &self,
        ct: &ClearCiphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        p_mid: u64,
    ) -> Result<ClearCiphertext, BackendError> {
        if self.params.plaintext_modulus == 0 && p_mid == 0 {
            return Err(BackendError::InvalidParameter {
                name: "p_mid",
                reason: "approximate pre-selection needs a non-zero midpoint".to_string(),
            });
        }
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_select_alt(
        &self,
        ct: &ClearCiphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        base_g: u32,
    ) -> Result<ClearCiphertext, BackendError> {
        check_base(base_g)?;
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_compare(
        &self,
        ct: &ClearCiphertext,
        lut: &[u64],
        enc: &FuncEncoding,
        odd: bool,
        shift: f64,
        base_g: u32,
    ) -> Result<ClearCiphertext, BackendError> {
        check_base(base_g)?;
        self.bootstrap(ct, lut, enc, odd.then_some(shift))
    }

    fn eval_func_wo_pbs1(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.require_aux_modulus("wo-bootstrap-1")?;
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_wo_pbs2(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.require_aux_modulus("wo-bootstrap-2")?;
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_bfv(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        self.require_aux_modulus("product-eval")?;
        self.bootstrap(ct, lut, enc, None)
    }

    fn eval_func_ks21(&self, ct: &ClearCiphertext, lut: &[u64], enc: &FuncEncoding) -> Result<ClearCiphertext, BackendError> {
        if self.params.base_g0 == 0 {
            return Err(BackendError::InvalidParameter {
                name: "base_g0",
                reason: "decomposition-based evaluation needs a first-level gadget base".to_string(),
            });
        }
        self.bootstrap(ct, lut, enc, None)
    }
}
