use crate::{
    api::{ContextGenerate, KeyGenerate, LweAddConst, LweDecrypt, LweExtract},
    error::BackendError,
    layouts::{BootstrapMethod, ExtractionDomain, LweInfos, SchemeParams},
};

pub fn test_extraction_roundtrip<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweDecrypt + LweAddConst + LweExtract,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [31u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();

    let domain: ExtractionDomain = ExtractionDomain {
        ring_dim: 1 << 16,
        modulus: 1 << 55,
        base_ks: 1 << 12,
    };
    let key: B::ExtractionKey = ctx.extraction_key_gen(&sk, &domain).unwrap();

    let space: u64 = domain.modulus;
    let q: u64 = params.q;
    [0u64, 1 << 40, 3 << 50, space - (1 << 44)].iter().for_each(|&m| {
        let mut ct: B::Ciphertext = ctx.extraction_encrypt(&key, m, space).unwrap();
        let noisy: u64 = ctx.extraction_decrypt(&key, &ct, space).unwrap();
        ctx.lwe_add_const_inplace(&mut ct, (m as u128 + space as u128 - noisy as u128) as u64 % space);
        assert_eq!(ctx.extraction_decrypt(&key, &ct, space).unwrap(), m);

        let switched: B::Ciphertext = ctx.extraction_switch(&key, &ct).unwrap();
        assert_eq!(switched.modulus(), q);
        let expected: u64 = ((m as u128 * q as u128 + space as u128 / 2) / space as u128) as u64 % q;
        let got: u64 = ctx.lwe_decrypt(&sk, &switched, q).unwrap();
        let distance: u64 = got.abs_diff(expected).min(q - got.abs_diff(expected));
        assert!(distance <= 1, "m={m} got={got} expected={expected}");
    });
}

pub fn test_extraction_key_mismatch<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweExtract,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [32u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    let domain: ExtractionDomain = ExtractionDomain {
        ring_dim: 1 << 16,
        modulus: 1 << 55,
        base_ks: 1 << 5,
    };
    let key_a: B::ExtractionKey = ctx.extraction_key_gen(&sk, &domain).unwrap();
    let key_b: B::ExtractionKey = ctx.extraction_key_gen(&sk, &domain).unwrap();
    let ct: B::Ciphertext = ctx.extraction_encrypt(&key_a, 7, 1 << 20).unwrap();
    assert_eq!(ctx.extraction_switch(&key_b, &ct).err(), Some(BackendError::KeyMismatch));
}
