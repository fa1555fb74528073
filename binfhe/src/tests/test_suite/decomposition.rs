use sampling::Source;

use crate::{
    api::{ContextGenerate, EvalRelu, HomDecompose, KeyGenerate, LweDecrypt, LweEncryptSk, MaxPlaintextSpace},
    error::BackendError,
    layouts::{BootstrapMethod, DecompositionKind, Freshness, SchemeParams},
};

/// `params` must carry a digit modulus and multi-level gadget bases.
pub fn test_decomposition_digits<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [21u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let mut source: Source = Source::new([22u8; 32]);
    let digit_modulus: u64 = params.plaintext_modulus;
    let q_in: u64 = 1 << 20;
    let space: u64 = ctx.max_plaintext_space() * (q_in / params.q);

    DecompositionKind::ALL.iter().for_each(|&kind| {
        (0..8).for_each(|_| {
            let mut m: u64 = source.next_u64_mod(space);
            let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, m, Freshness::Fresh, space, Some(q_in)).unwrap();
            let digits: Vec<B::Ciphertext> = ctx.eval_decomp(kind, &ct).unwrap();

            let mut k: usize = 0;
            let mut remaining: u64 = space;
            while remaining > 1 {
                let cur_mod: u64 = remaining.min(digit_modulus);
                assert_eq!(ctx.lwe_decrypt(&sk, &digits[k], cur_mod).unwrap(), m % cur_mod, "{kind} digit {k}");
                remaining /= digit_modulus;
                m /= digit_modulus;
                k += 1;
            }
            assert_eq!(k, digits.len());
        });
    });
}

pub fn test_decomposition_ceiling<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + HomDecompose,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [23u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let q_in: u64 = 1 << 30;
    let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, 5, Freshness::Fresh, 1 << 10, Some(q_in)).unwrap();
    assert!(matches!(
        ctx.eval_decomp(DecompositionKind::HomFloor, &ct),
        Err(BackendError::CiphertextModulus { modulus, .. }) if modulus == q_in
    ));
    assert!(ctx.eval_decomp(DecompositionKind::Reduce, &ct).is_ok());
}

pub fn test_relu_discrete<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + EvalRelu,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [24u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let q_in: u64 = 1 << 28;
    let p: u64 = 1 << 10;
    [0u64, 1, 300, p / 2 - 1, p / 2, 900, p - 1].iter().for_each(|&m| {
        let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, m, Freshness::Fresh, p, Some(q_in)).unwrap();
        let digits: Vec<B::Ciphertext> = ctx.eval_decomp(DecompositionKind::Reduce, &ct).unwrap();
        let msd: &B::Ciphertext = digits.last().unwrap();
        let relu: B::Ciphertext = ctx.eval_relu(&ct, msd, 1 << 27, 1 << 18).unwrap();
        let expected: u64 = if m >= p / 2 { 0 } else { m };
        assert_eq!(ctx.lwe_decrypt(&sk, &relu, p).unwrap(), expected, "m={m}");
    });
}
