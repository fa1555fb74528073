use crate::{
    api::{BinFheScheme, ContextGenerate, FuncEval, KeyGenerate, LweDecrypt, LweEncryptSk},
    error::BackendError,
    layouts::{BootstrapMethod, Freshness, FuncEncoding, LweInfos, SchemeParams},
};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

type Variant<B> =
    fn(&B, &<B as BinFheScheme>::Ciphertext, &[u64], &FuncEncoding) -> Result<<B as BinFheScheme>::Ciphertext, BackendError>;

/// Every evaluation variant, with fixed tag-specific extras.
fn variants<B: FuncEval>() -> [(&'static str, Variant<B>); 11] {
    [
        ("eval_func", B::eval_func),
        ("compress", B::eval_func_compress),
        ("cancel_sign", B::eval_func_cancel_sign),
        ("select", |ctx: &B, ct: &B::Ciphertext, lut: &[u64], enc: &FuncEncoding| {
            ctx.eval_func_select(ct, lut, enc, 1 << 27)
        }),
        ("pre_select", |ctx: &B, ct: &B::Ciphertext, lut: &[u64], enc: &FuncEncoding| {
            ctx.eval_func_pre_select(ct, lut, enc, 1 << 8)
        }),
        ("select_alt", |ctx: &B, ct: &B::Ciphertext, lut: &[u64], enc: &FuncEncoding| {
            ctx.eval_func_select_alt(ct, lut, enc, 1 << 18)
        }),
        ("compare", |ctx: &B, ct: &B::Ciphertext, lut: &[u64], enc: &FuncEncoding| {
            ctx.eval_func_compare(ct, lut, enc, false, 0.0, 1 << 27)
        }),
        ("wo_pbs1", B::eval_func_wo_pbs1),
        ("wo_pbs2", B::eval_func_wo_pbs2),
        ("bfv", B::eval_func_bfv),
        ("ks21", B::eval_func_ks21),
    ]
}

/// `params` must enable every variant: discrete plaintext modulus, auxiliary modulus and `base_g0`.
pub fn test_discrete_lut_all_variants<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [11u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let p: u64 = params.plaintext_modulus;
    let lut: Vec<u64> = (0..p).map(|i| (5 * i + 3) % p).collect();
    let enc: FuncEncoding = FuncEncoding::default();

    variants::<B>().iter().for_each(|&(name, eval)| {
        (0..p).for_each(|m| {
            let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, m, Freshness::Fresh, p, None).unwrap();
            let ct_f: B::Ciphertext = eval(&ctx, &ct, &lut, &enc).unwrap();
            assert_eq!(ctx.lwe_decrypt(&sk, &ct_f, p).unwrap(), lut[m as usize], "{name} m={m}");
        });
    });
}

pub fn test_discrete_lut_size_mismatch<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [12u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let p: u64 = params.plaintext_modulus;
    let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, 1, Freshness::Fresh, p, None).unwrap();
    let short: Vec<u64> = vec![0; p as usize - 1];
    assert!(matches!(
        ctx.eval_func(&ct, &short, &FuncEncoding::default()),
        Err(BackendError::LutSize { .. })
    ));
}

pub fn test_requires_bootstrap_key<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [13u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    let p: u64 = params.plaintext_modulus;
    let lut: Vec<u64> = (0..p).collect();
    let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, 1, Freshness::Fresh, p, None).unwrap();
    assert_eq!(
        ctx.eval_func(&ct, &lut, &FuncEncoding::default()).err(),
        Some(BackendError::MissingBootstrapKey)
    );
}

/// `params` must be an approximate-mode parameter set (plaintext modulus 0).
pub fn test_continuous_sigmoid<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [14u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let q: u64 = params.q;
    let delta_in: f64 = q as f64 / 16.0;
    let enc: FuncEncoding = FuncEncoding {
        delta_in,
        delta_out: (1u64 << 23) as f64,
        q_out: 1 << 25,
        function: Some(sigmoid),
    };

    [-7.5f64, -1.0, 0.0, 0.25, 3.0, 7.9].iter().for_each(|&x| {
        let m: u64 = ((x * delta_in).round() as i64).rem_euclid(q as i64) as u64;
        let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, m, Freshness::Trivial, q, None).unwrap();
        let ct_f: B::Ciphertext = ctx.eval_func(&ct, &[], &enc).unwrap();
        assert_eq!(ct_f.modulus(), enc.q_out);

        let res: u64 = ctx.lwe_decrypt(&sk, &ct_f, ct_f.modulus()).unwrap();
        let signed: i64 = if res >= enc.q_out / 2 { res as i64 - enc.q_out as i64 } else { res as i64 };
        let y: f64 = signed as f64 / enc.delta_out;
        assert!((y - sigmoid(x)).abs() < 1e-3, "x={x} y={y}");
    });
}

pub fn test_compare_odd_symmetry<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [15u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();

    let q: u64 = params.q;
    let delta_in: f64 = q as f64 / 16.0;
    let enc: FuncEncoding = FuncEncoding {
        delta_in,
        delta_out: (1u64 << 23) as f64,
        q_out: 1 << 25,
        function: Some(sigmoid),
    };

    let x: f64 = -2.0;
    let m: u64 = ((x * delta_in).round() as i64).rem_euclid(q as i64) as u64;
    let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, m, Freshness::Trivial, q, None).unwrap();

    let decode = |ct: &B::Ciphertext| -> f64 {
        let res: u64 = ctx.lwe_decrypt(&sk, ct, ct.modulus()).unwrap();
        let signed: i64 = if res >= enc.q_out / 2 { res as i64 - enc.q_out as i64 } else { res as i64 };
        signed as f64 / enc.delta_out
    };

    let mirrored: f64 = decode(&ctx.eval_func_compare(&ct, &[], &enc, true, 0.5, 1 << 27).unwrap());
    assert!((mirrored - sigmoid(x)).abs() < 1e-3);

    let unshifted: f64 = decode(&ctx.eval_func_compare(&ct, &[], &enc, true, 0.0, 1 << 27).unwrap());
    assert!((unshifted - sigmoid(x)).abs() > 0.5);
}

pub fn test_rejects_invalid_base<B>(params: &SchemeParams)
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + FuncEval,
{
    let mut ctx: B = B::generate(params, BootstrapMethod::Ginx, [16u8; 32]).unwrap();
    let sk: B::SecretKey = ctx.key_gen().unwrap();
    ctx.bootstrap_key_gen(&sk).unwrap();
    let p: u64 = params.plaintext_modulus;
    let lut: Vec<u64> = (0..p).collect();
    let ct: B::Ciphertext = ctx.lwe_encrypt_sk(&sk, 1, Freshness::Fresh, p, None).unwrap();
    assert_eq!(
        ctx.eval_func_select(&ct, &lut, &FuncEncoding::default(), 3).err(),
        Some(BackendError::InvalidBase(3))
    );
}
