use binfhe::{PublicKeyMode, SchemeParams};

use super::{Catalog, Configuration, N20, N25, N35, P53, Q26, Q53, RealFunction, Section};
use crate::dispatch::Algorithm::{self, *};

const STD: f64 = 3.19;
const BASE_KS: u32 = 1 << 5;
const BASE_PK: u32 = 1 << 5;

fn params(n: u32, ring_dim: u32, q: u64, big_q: u64, q_ks: u64, base_g: u32, beta: u32) -> SchemeParams {
    SchemeParams::new(n, ring_dim, q, big_q, q_ks, STD, BASE_KS, base_g, beta)
}

/// Ring dimension 2^11 over Q53 with a 2^20 key-switching modulus.
fn ring11(n: u32, q: u64, base_g: u32, beta: u32) -> SchemeParams {
    params(n, 1 << 11, q, Q53, 1 << 20, base_g, beta)
}

/// Ring dimension 2^10 over Q26.
fn tiny(base_g: u32, beta: u32) -> SchemeParams {
    params(N20, 1 << 10, 1 << 11, Q26, 1 << 20, base_g, beta)
}

/// Approximate-encoding parameters: n = 955 with a 2^25 key-switching modulus.
fn approx(q: u64) -> SchemeParams {
    params(N25, 1 << 11, q, Q53, 1 << 25, 1 << 27, 47)
}

fn ks21(desc: &str, p: u64, n: u32, base_g: u32, q_from: u64, base_g0: u32, beta: u32) -> Configuration {
    Configuration::discrete(
        desc,
        DecompositionEval,
        p,
        ring11(n, 1 << 12, base_g, beta)
            .with_public_key(BASE_PK, q_from, PublicKeyMode::Const)
            .with_base_g0(base_g0),
    )
}

/// Variants that relinearize through the auxiliary modulus `P53`.
fn with_aux(algorithm: Algorithm, desc: &str, p: u64, params: SchemeParams, q_from: u64) -> Configuration {
    Configuration::discrete(
        desc,
        algorithm,
        p,
        params
            .with_public_key(BASE_PK, q_from, PublicKeyMode::Const)
            .with_aux_modulus(P53, 1 << 27),
    )
}

fn pk(params: SchemeParams, q_from: u64, mode: PublicKeyMode) -> SchemeParams {
    params.with_public_key(BASE_PK, q_from, mode)
}

fn two_levels() -> Vec<u32> {
    vec![1 << 18, 1 << 27]
}

fn standard() -> Vec<Configuration> {
    use PublicKeyMode::{Full, Half};
    vec![
        Configuration::discrete("standard basic-eval, p = 8", BasicEval, 8, ring11(N35, 1 << 11, 1 << 27, 55)),
        ks21("standard decomposition-eval, p = 32, Bg = 2^18", 32, N35, 1 << 18, 1 << 30, 1 << 6, 56),
        ks21("standard decomposition-eval, p = 32, Bg = 2^14", 32, N35, 1 << 14, 1 << 35, 1 << 10, 56),
        ks21("standard decomposition-eval, p = 32, Bg = 2^11", 32, N35, 1 << 11, 1 << 35, 1 << 13, 56),
        ks21("standard decomposition-eval, p = 16, Bg = 2^18", 16, N35, 1 << 18, 1 << 30, 1 << 8, 56),
        ks21("standard decomposition-eval, p = 16, Bg = 2^14", 16, N35, 1 << 14, 1 << 35, 1 << 12, 56),
        ks21("standard decomposition-eval, p = 16, Bg = 2^11", 16, N35, 1 << 11, 1 << 35, 1 << 15, 56),
        Configuration::discrete("standard compare, p = 32", Compare, 32, ring11(N35, 1 << 12, 1 << 27, 56)),
        Configuration::discrete("standard compare, p = 16", Compare, 16, ring11(N35, 1 << 12, 1 << 27, 56)),
        Configuration::discrete(
            "standard compare, p = 32, multi-value",
            Compare,
            32,
            ring11(N35, 1 << 12, 1 << 18, 56)
                .with_base_gmv(128)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "standard compare, p = 16, multi-value",
            Compare,
            16,
            params(N35, 1 << 11, 1 << 12, Q53, 1 << 25, 1 << 27, 55).with_base_gmv(64),
        ),
        with_aux(WoBootstrap1, "standard wo-bootstrap-1, p = 16", 16, ring11(N35, 1 << 11, 1 << 18, 55), 1 << 30),
        with_aux(
            WoBootstrap1,
            "standard wo-bootstrap-1, p = 16, multi-value",
            16,
            ring11(N35, 1 << 11, 1 << 11, 55).with_base_gmv(32),
            1 << 30,
        ),
        with_aux(WoBootstrap2, "standard wo-bootstrap-2, p = 32", 32, ring11(N35, 1 << 12, 1 << 14, 56), 1 << 30),
        with_aux(WoBootstrap2, "standard wo-bootstrap-2, p = 16", 16, ring11(N35, 1 << 12, 1 << 18, 56), 1 << 30),
        with_aux(
            WoBootstrap2,
            "standard wo-bootstrap-2, p = 32, multi-value",
            32,
            ring11(N35, 1 << 12, 1 << 6, 56).with_base_gmv(128),
            1 << 30,
        ),
        with_aux(
            WoBootstrap2,
            "standard wo-bootstrap-2, p = 16, multi-value",
            16,
            ring11(N35, 1 << 12, 1 << 11, 56).with_base_gmv(64),
            1 << 30,
        ),
        with_aux(WoBootstrap1, "standard wo-bootstrap-1+, p = 16", 16, ring11(N35, 1 << 11, 1 << 18, 55), 1 << 25),
        with_aux(
            WoBootstrap1,
            "standard wo-bootstrap-1+, p = 16, multi-value",
            16,
            ring11(N35, 1 << 11, 1 << 18, 55).with_base_gmv(32),
            1 << 25,
        ),
        with_aux(ProductEval, "standard product-eval, p = 32", 32, ring11(N35, 1 << 12, 1 << 18, 56), 1 << 25),
        with_aux(
            ProductEval,
            "standard product-eval, p = 32, multi-value",
            32,
            ring11(N35, 1 << 12, 1 << 11, 56).with_base_gmv(128),
            1 << 25,
        ),
        with_aux(
            ProductEval,
            "standard product-eval, p = 16, multi-value",
            16,
            ring11(N35, 1 << 12, 1 << 18, 56).with_base_gmv(64),
            1 << 25,
        ),
        Configuration::discrete("standard compress, p = 16", Compress, 16, ring11(N35, 1 << 12, 1 << 27, 56)),
        Configuration::discrete(
            "standard cancel-sign, p = 16",
            CancelSign,
            16,
            pk(ring11(N35, 1 << 11, 1 << 27, 55), 1 << 15, Full),
        ),
        Configuration::discrete("standard select, p = 32", Select, 32, pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 15, Half)),
        Configuration::discrete("standard select, p = 16", Select, 16, pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 15, Half)),
        Configuration::discrete(
            "standard select, p = 32, multi-value",
            Select,
            32,
            pk(ring11(N35, 1 << 12, 1 << 18, 56), 1 << 15, Half)
                .with_base_gmv(64)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "standard select, p = 16, multi-value",
            Select,
            16,
            pk(ring11(N35, 1 << 12, 1 << 18, 56), 1 << 15, Half)
                .with_base_gmv(32)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "standard pre-select, p = 32",
            PreSelect,
            32,
            pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 20, Full).with_base_g0(2),
        ),
        Configuration::discrete(
            "standard pre-select, p = 16",
            PreSelect,
            16,
            pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 20, Full).with_base_g0(4),
        ),
        Configuration::discrete("standard select-alt, p = 32", SelectAlt, 32, pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 15, Full)),
        Configuration::discrete("standard select-alt, p = 16", SelectAlt, 16, pk(ring11(N35, 1 << 12, 1 << 27, 56), 1 << 15, Full)),
        Configuration::discrete(
            "standard select-alt, p = 32, multi-value",
            SelectAlt,
            32,
            pk(ring11(N35, 1 << 12, 1 << 18, 56), 1 << 15, Full)
                .with_base_gmv(128)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "standard select-alt, p = 16, multi-value",
            SelectAlt,
            16,
            pk(ring11(N35, 1 << 12, 1 << 18, 56), 1 << 15, Full)
                .with_base_gmv(64)
                .with_base_gs(two_levels()),
        ),
    ]
}

fn small_and_tiny() -> Vec<Configuration> {
    use PublicKeyMode::{Full, Half};
    vec![
        Configuration::discrete("small basic-eval, p = 16", BasicEval, 16, ring11(N20, 1 << 11, 1 << 27, 42)),
        ks21("small decomposition-eval, p = 32, Bg = 2^18", 32, N20, 1 << 18, 1 << 30, 1 << 7, 42),
        ks21("small decomposition-eval, p = 32, Bg = 2^14", 32, N20, 1 << 14, 1 << 35, 1 << 11, 42),
        ks21("small decomposition-eval, p = 32, Bg = 2^11", 32, N20, 1 << 11, 1 << 35, 1 << 14, 42),
        ks21("small decomposition-eval, p = 16, Bg = 2^18", 16, N20, 1 << 18, 1 << 30, 1 << 9, 42),
        ks21("small decomposition-eval, p = 16, Bg = 2^14", 16, N20, 1 << 14, 1 << 35, 1 << 13, 42),
        ks21("small decomposition-eval, p = 16, Bg = 2^11", 16, N20, 1 << 11, 1 << 35, 1 << 16, 42),
        Configuration::discrete("small compare, p = 32", Compare, 32, ring11(N20, 1 << 12, 1 << 27, 42)),
        Configuration::discrete("small compare, p = 16", Compare, 16, ring11(N20, 1 << 12, 1 << 27, 42)),
        Configuration::discrete("tiny compare, p = 16", Compare, 16, tiny(1 << 5, 53)),
        Configuration::discrete(
            "small compare, p = 32, multi-value",
            Compare,
            32,
            ring11(N20, 1 << 12, 1 << 18, 42).with_base_gmv(128),
        ),
        Configuration::discrete(
            "small compare, p = 16, multi-value",
            Compare,
            16,
            ring11(N20, 1 << 12, 1 << 27, 42).with_base_gmv(64),
        ),
        with_aux(WoBootstrap1, "small wo-bootstrap-1, p = 16", 16, ring11(N20, 1 << 11, 1 << 18, 42), 1 << 30),
        with_aux(
            WoBootstrap1,
            "small wo-bootstrap-1, p = 16, multi-value",
            16,
            ring11(N20, 1 << 11, 1 << 11, 42).with_base_gmv(32),
            1 << 25,
        ),
        with_aux(WoBootstrap2, "small wo-bootstrap-2, p = 32", 32, ring11(N20, 1 << 12, 1 << 14, 42), 1 << 30),
        with_aux(WoBootstrap2, "small wo-bootstrap-2, p = 16", 16, ring11(N20, 1 << 12, 1 << 18, 42), 1 << 30),
        with_aux(
            WoBootstrap2,
            "small wo-bootstrap-2, p = 32, multi-value",
            32,
            ring11(N20, 1 << 12, 1 << 8, 42).with_base_gmv(128),
            1 << 30,
        ),
        with_aux(
            WoBootstrap2,
            "small wo-bootstrap-2, p = 16, multi-value",
            16,
            ring11(N20, 1 << 12, 1 << 11, 42).with_base_gmv(64),
            1 << 30,
        ),
        with_aux(WoBootstrap1, "small wo-bootstrap-1+, p = 16", 16, ring11(N25, 1 << 11, 1 << 18, 47), 1 << 20),
        with_aux(
            WoBootstrap1,
            "small wo-bootstrap-1+, p = 16, multi-value",
            16,
            ring11(N20, 1 << 11, 1 << 18, 42).with_base_gmv(32),
            1 << 20,
        ),
        with_aux(ProductEval, "small product-eval, p = 32", 32, ring11(N25, 1 << 12, 1 << 18, 47), 1 << 25),
        with_aux(
            ProductEval,
            "small product-eval, p = 32, multi-value",
            32,
            ring11(N20, 1 << 12, 1 << 14, 42).with_base_gmv(128),
            1 << 25,
        ),
        with_aux(
            ProductEval,
            "small product-eval, p = 16, multi-value",
            16,
            ring11(N20, 1 << 12, 1 << 18, 42).with_base_gmv(64),
            1 << 20,
        ),
        Configuration::discrete("small compress, p = 16", Compress, 16, ring11(N20, 1 << 12, 1 << 27, 42)),
        Configuration::discrete(
            "small cancel-sign, p = 16",
            CancelSign,
            16,
            pk(ring11(N20, 1 << 11, 1 << 27, 42), 1 << 15, Full),
        ),
        Configuration::discrete("small select, p = 32", Select, 32, pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 15, Half)),
        Configuration::discrete("small select, p = 16", Select, 16, pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 15, Half)),
        Configuration::discrete("tiny select, p = 16", Select, 16, pk(tiny(1 << 5, 53), 1 << 15, Half)),
        Configuration::discrete(
            "small select, p = 32, multi-value",
            Select,
            32,
            pk(ring11(N20, 1 << 12, 1 << 18, 42), 1 << 15, Half)
                .with_base_gmv(64)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "small select, p = 16, multi-value",
            Select,
            16,
            pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 15, Half).with_base_gmv(32),
        ),
        Configuration::discrete(
            "small pre-select, p = 32",
            PreSelect,
            32,
            pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 20, Full).with_base_g0(8),
        ),
        Configuration::discrete(
            "small pre-select, p = 16",
            PreSelect,
            16,
            pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 20, Full).with_base_g0(8),
        ),
        Configuration::discrete("small select-alt, p = 32", SelectAlt, 32, pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 15, Full)),
        Configuration::discrete("small select-alt, p = 16", SelectAlt, 16, pk(ring11(N20, 1 << 12, 1 << 27, 42), 1 << 15, Full)),
        Configuration::discrete("tiny select-alt, p = 16", SelectAlt, 16, pk(tiny(1 << 4, 45), 1 << 15, Full)),
        Configuration::discrete(
            "small select-alt, p = 32, multi-value",
            SelectAlt,
            32,
            pk(ring11(N20, 1 << 12, 1 << 18, 42), 1 << 15, Full)
                .with_base_gmv(128)
                .with_base_gs(two_levels()),
        ),
        Configuration::discrete(
            "small select-alt, p = 16, multi-value",
            SelectAlt,
            16,
            pk(ring11(N20, 1 << 12, 1 << 18, 42), 1 << 15, Full)
                .with_base_gmv(64)
                .with_base_gs(two_levels()),
        ),
    ]
}

/// The same eight approximate-encoding variants for a given function and output scaling.
/// `narrow` is the `(delta_in, delta_out, q_out)` of the `q = 2^11` entries, `wide` of the `q = 2^12` ones.
fn approximate(label: &str, function: RealFunction, narrow: (f64, f64, u64), wide: (f64, f64, u64)) -> Vec<Configuration> {
    use PublicKeyMode::{Const, Full, Half};
    let desc = |algorithm: &str| format!("approximate {algorithm}, {label}");
    vec![
        Configuration::approximate(&desc("basic-eval"), BasicEval, narrow, function, approx(1 << 11)),
        Configuration::approximate(&desc("compare"), Compare, wide, function, approx(1 << 12)),
        Configuration::approximate(&desc("compress"), Compress, wide, function, approx(1 << 12)),
        Configuration::approximate(&desc("cancel-sign"), CancelSign, narrow, function, pk(approx(1 << 11), 1 << 25, Full)),
        Configuration::approximate(&desc("select"), Select, wide, function, pk(approx(1 << 12), 1 << 25, Half)),
        Configuration::approximate(
            &desc("pre-select"),
            PreSelect,
            wide,
            function,
            pk(approx(1 << 12), 1 << 25, Const).with_base_g0(2),
        )
        .with_extra(1 << 8),
        Configuration::approximate(&desc("select-alt"), SelectAlt, wide, function, pk(approx(1 << 12), 1 << 25, Full)),
        Configuration::approximate(&format!("{} [odd symmetry]", desc("compare")), Compare, wide, function, approx(1 << 12))
            .with_extra(1),
    ]
}

pub(super) fn build() -> Catalog {
    let two: fn(u32) -> f64 = |log| (1u64 << log) as f64;
    Catalog::new(vec![
        Section {
            title: "standard".to_string(),
            entries: standard(),
        },
        Section {
            title: "small & tiny".to_string(),
            entries: small_and_tiny(),
        },
        Section {
            title: "approximate (sigmoid)".to_string(),
            entries: approximate(
                "sigmoid (-8, 8) -> (-2, 2)",
                RealFunction::SIGMOID,
                (two(7), two(23), 1 << 25),
                (two(8), two(23), 1 << 25),
            ),
        },
        Section {
            title: "approximate (identity)".to_string(),
            entries: approximate(
                "identity (-8, 8) -> (-8, 8)",
                RealFunction::IDENTITY,
                (two(7), two(7), 1 << 11),
                (two(8), two(8), 1 << 12),
            ),
        },
    ])
}
