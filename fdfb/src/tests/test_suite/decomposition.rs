use binfhe::{
    ContextGenerate, DecompositionKind, EvalRelu, HomDecompose, KeyGenerate, LweDecrypt, LweEncryptSk, MaxPlaintextSpace, SchemeParams,
};

use crate::{
    catalog::{DecompositionConfiguration, ReluConfiguration, decomposition_catalog, relu_catalog},
    error::HarnessError,
    fixture::ContextCache,
    harness::{DecompositionHarness, DecompositionTrial, ReluHarness, RunOptions, Statistics},
};

fn seeded() -> RunOptions {
    RunOptions {
        seed: Some(0xdec0),
        ..Default::default()
    }
}

/// Every decomposition configuration over every input modulus its kind supports.
pub fn test_decomposition_catalog<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
{
    let mut cache: ContextCache<B, (usize, u32)> = ContextCache::new([2u8; 32]);
    let mut harness: DecompositionHarness = DecompositionHarness::new(&seeded());

    decomposition_catalog().iter().enumerate().for_each(|(index, configuration)| {
        let ceiling: u32 = configuration.kind.modulus_ceiling().trailing_zeros();
        (13..=ceiling).step_by(4).chain([ceiling]).for_each(|log_q_in| {
            let q_in: u64 = 1 << log_q_in;
            let params: SchemeParams = DecompositionHarness::context_params(configuration, q_in).unwrap();
            let cached = cache.ensure((index, log_q_in), &params).unwrap();
            let mut trials: Vec<DecompositionTrial> = Vec::new();
            let stats: Statistics = harness
                .run_with(cached, configuration, q_in, |t| trials.push(t.clone()))
                .unwrap();
            assert!(stats.passed(), "{} at 2^{log_q_in}: {stats}", configuration.desc);
            assert_eq!(trials.len(), 8);
            trials.iter().for_each(|t| assert_eq!(t.digits.len(), t.expected_digits));
        });
    });
}

pub fn test_decomposition_above_ceiling<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
{
    let configuration: &DecompositionConfiguration = DecompositionConfiguration::get(0).unwrap();
    assert_eq!(configuration.kind, DecompositionKind::HomFloor);
    assert!(matches!(
        DecompositionHarness::context_params(configuration, 1 << 30),
        Err(HarnessError::ModulusTooLarge { .. })
    ));
}

pub fn test_decomposition_rejects_misaligned_modulus<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + MaxPlaintextSpace,
{
    let configuration: &DecompositionConfiguration = DecompositionConfiguration::get(2).unwrap();
    let mut cache: ContextCache<B> = ContextCache::new([3u8; 32]);
    let params: SchemeParams = DecompositionHarness::context_params(configuration, 1 << 20).unwrap();
    let cached = cache.ensure(2, &params).unwrap();
    let mut harness: DecompositionHarness = DecompositionHarness::new(&seeded());
    assert!(matches!(
        harness.run(cached, configuration, 1 << 11),
        Err(HarnessError::InvalidConfiguration { .. })
    ));
}

pub fn test_relu_catalog<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + EvalRelu,
{
    let mut cache: ContextCache<B> = ContextCache::new([4u8; 32]);
    relu_catalog().iter().enumerate().for_each(|(index, configuration)| {
        let cached = cache.ensure(index, &configuration.context_params()).unwrap();
        let options: RunOptions = RunOptions {
            trials: Some(32),
            ..seeded()
        };
        let stats: Statistics = ReluHarness::new(&options).run(cached, configuration).unwrap();
        assert!(stats.passed(), "{}: {stats}", configuration.desc);
        assert_eq!(stats.trials(), 32);
        assert_eq!(stats.depths().len(), usize::from(!configuration.is_discrete()));
    });
}

pub fn test_relu_zeroes_negatives<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + HomDecompose + EvalRelu,
{
    let configuration: &ReluConfiguration = ReluConfiguration::get(0).unwrap();
    let mut cache: ContextCache<B> = ContextCache::new([5u8; 32]);
    let cached = cache.ensure(0, &configuration.context_params()).unwrap();
    let options: RunOptions = RunOptions {
        trials: Some(64),
        ..seeded()
    };
    let space: u64 = configuration.space();
    let mut negatives: usize = 0;
    ReluHarness::new(&options)
        .run_with(cached, configuration, |t| {
            if t.input >= space / 2 {
                negatives += 1;
                assert_eq!(t.observed, 0.0);
            } else {
                assert_eq!(t.observed, t.input as f64);
            }
        })
        .unwrap();
    assert!(negatives > 0);
}
