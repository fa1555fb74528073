use binfhe::{ContextGenerate, FuncEval, KeyGenerate, LweAddConst, LweDecrypt, LweEncryptSk, LweExtract, SchemeParams};

use crate::{
    catalog::{Catalog, Configuration, N20, N35, Q53, RealFunction},
    dispatch::Algorithm,
    error::HarnessError,
    fixture::{CachedContext, ContextCache},
    harness::{InputMode, PrecisionHarness, RunOptions, Statistics, Trial},
};

fn discrete_params() -> SchemeParams {
    SchemeParams::new(N35, 1 << 11, 1 << 11, Q53, 1 << 20, 3.19, 1 << 5, 1 << 27, 55)
}

fn find(prefix: &str) -> &'static Configuration {
    Catalog::function_evaluation()
        .iter()
        .map(|(_, c)| c)
        .find(|c| c.desc.starts_with(prefix))
        .unwrap_or_else(|| panic!("no catalog entry starting with `{prefix}`"))
}

fn run<B>(configuration: &Configuration, options: RunOptions) -> Result<(Statistics, Vec<Trial>), HarnessError>
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let mut cache: ContextCache<B> = ContextCache::new([1u8; 32]);
    let cached: &mut CachedContext<B> = cache.ensure(0, &configuration.context_params())?;
    let mut harness: PrecisionHarness = PrecisionHarness::new(options);
    let trials: usize = harness.trial_count(configuration);
    let mut seen: Vec<Trial> = Vec::new();
    let stats: Statistics = harness.run_trials_with(cached, configuration, trials, |t| seen.push(t.clone()))?;
    Ok((stats, seen))
}

fn seeded() -> RunOptions {
    RunOptions {
        seed: Some(0x5eed),
        ..Default::default()
    }
}

pub fn test_identity_roundtrip<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let p: u64 = 16;
    let configuration: Configuration = Configuration::discrete("identity", Algorithm::BasicEval, p, discrete_params());
    let options: RunOptions = RunOptions {
        lut: Some((0..p).collect()),
        ..seeded()
    };
    let (stats, trials) = run::<B>(&configuration, options).unwrap();
    assert!(stats.passed(), "{stats}");
    assert_eq!(stats.trials(), p as usize);
    trials.iter().for_each(|t| {
        assert_eq!(t.input, t.index as u64);
        assert_eq!(t.observed, t.index as f64);
    });
}

pub fn test_fixed_lut<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = Catalog::function_evaluation().get(0).unwrap();
    assert_eq!(configuration.p, 8);
    let options: RunOptions = RunOptions {
        lut: Some(vec![3, 1, 4, 1, 5, 9, 2, 6]),
        ..seeded()
    };
    let (stats, trials) = run::<B>(configuration, options).unwrap();
    assert_eq!(stats.trials(), 8);
    assert_eq!(stats.failure_count(), 0, "{stats}");
    assert_eq!(trials[5].expected, 1.0);
}

pub fn test_lut_size_rejected<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = Catalog::function_evaluation().get(0).unwrap();
    let options: RunOptions = RunOptions {
        lut: Some(vec![1, 2, 3]),
        ..seeded()
    };
    assert!(matches!(
        run::<B>(configuration, options),
        Err(HarnessError::InvalidConfiguration { .. })
    ));
}

pub fn test_iterated_lut_composes<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let p: u64 = 16;
    let configuration: Configuration = Configuration::discrete("shift", Algorithm::BasicEval, p, discrete_params());
    let options: RunOptions = RunOptions {
        lut: Some((0..p).map(|i| (i + 3) % p).collect()),
        eval_iterations: 3,
        ..seeded()
    };
    let (stats, trials) = run::<B>(&configuration, options).unwrap();
    assert!(stats.passed(), "{stats}");
    assert_eq!(stats.evaluations(), 3 * p as usize);
    trials.iter().for_each(|t| {
        assert_eq!(t.expected as u64, (t.input + 3 * (t.depth as u64 + 1)) % p);
    });
}

pub fn test_every_discrete_entry<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    Catalog::function_evaluation()
        .iter()
        .filter(|(_, c)| c.is_discrete())
        .for_each(|(i, c)| {
            let (stats, _) = run::<B>(c, seeded()).unwrap_or_else(|e| panic!("entry {i}: {e}"));
            assert!(stats.passed(), "entry {i}: {stats}");
        });
}

pub fn test_sigmoid_precision<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = find("approximate basic-eval, sigmoid");
    assert_eq!(configuration.function, Some(RealFunction::SIGMOID));
    let (stats, trials) = run::<B>(configuration, seeded()).unwrap();
    assert_eq!(stats.trials(), 1000);
    assert!(stats.passed(), "{stats}");
    assert!(stats.depths()[0].mean() < 0.05);
    assert!(trials.iter().all(|t| t.input_real.is_some_and(|x| x.abs() < 8.0)));
}

pub fn test_every_approximate_entry<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    Catalog::function_evaluation()
        .iter()
        .filter(|(_, c)| !c.is_discrete())
        .for_each(|(i, c)| {
            let options: RunOptions = RunOptions {
                trials: Some(200),
                input_mode: InputMode::Uniform,
                ..seeded()
            };
            let (stats, _) = run::<B>(c, options).unwrap_or_else(|e| panic!("entry {i}: {e}"));
            assert!(stats.passed(), "entry {i}: {stats}");
        });
}

pub fn test_iterated_identity<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = find("approximate basic-eval, identity");
    let options: RunOptions = RunOptions {
        trials: Some(64),
        eval_iterations: 3,
        ..seeded()
    };
    let (stats, _) = run::<B>(configuration, options).unwrap();
    assert!(stats.passed(), "{stats}");
    assert_eq!(stats.depths().len(), 3);
    stats.depths().iter().for_each(|acc| assert_eq!(acc.count, 64));
}

pub fn test_fixed_input<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = find("approximate basic-eval, sigmoid");
    let options: RunOptions = RunOptions {
        trials: Some(4),
        input_mode: InputMode::Fixed(-2.5),
        ..seeded()
    };
    let (_, trials) = run::<B>(configuration, options).unwrap();
    trials.iter().for_each(|t| {
        assert_eq!(t.input_real, Some(-2.5));
        assert!((t.expected - RealFunction::SIGMOID.eval(-2.5)).abs() < 1e-12);
    });
}

pub fn test_extracted_inputs<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = find("approximate basic-eval, sigmoid");
    let options: RunOptions = RunOptions {
        trials: Some(200),
        extracted: true,
        ..seeded()
    };
    let (stats, _) = run::<B>(configuration, options).unwrap();
    assert!(stats.passed(), "{stats}");
    assert!(stats.depths()[0].mean() < 0.05);

    let unsupported: Configuration = Configuration {
        params: SchemeParams {
            n: N20,
            ..configuration.params.clone()
        },
        ..configuration.clone()
    };
    let options: RunOptions = RunOptions {
        trials: Some(1),
        extracted: true,
        ..seeded()
    };
    assert!(matches!(
        run::<B>(&unsupported, options),
        Err(HarnessError::UnsupportedExtractionDimension(N20))
    ));
}

pub fn test_zero_iterations_rejected<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = Catalog::function_evaluation().get(0).unwrap();
    let options: RunOptions = RunOptions {
        eval_iterations: 0,
        ..seeded()
    };
    assert!(run::<B>(configuration, options).is_err());
}

pub fn test_seeded_runs_repeat<B>()
where
    B: ContextGenerate + KeyGenerate + LweEncryptSk + LweDecrypt + LweAddConst + FuncEval + LweExtract,
{
    let configuration: &Configuration = find("approximate compare, sigmoid");
    let options: RunOptions = RunOptions {
        trials: Some(16),
        input_mode: InputMode::Uniform,
        ..seeded()
    };
    let (_, first) = run::<B>(configuration, options.clone()).unwrap();
    let (_, second) = run::<B>(configuration, options).unwrap();
    let inputs = |trials: &[Trial]| trials.iter().map(|t| t.input).collect::<Vec<u64>>();
    assert_eq!(inputs(&first), inputs(&second));
}
