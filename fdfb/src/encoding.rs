//! Fixed-point encoding of reals into `Z_space` and back.

/// `round(x * delta) mod space`.
pub fn encode(x: f64, delta: f64, space: u64) -> u64 {
    ((x * delta).round() as i128).rem_euclid(space as i128) as u64
}

/// Representative of `m` in `[-space/2, space/2)` divided by `delta`.
pub fn decode(m: u64, space: u64, delta: f64) -> f64 {
    centered(m, space) as f64 / delta
}

/// Representative of `m mod modulus` in `[-modulus/2, modulus/2)`.
pub fn centered(m: u64, modulus: u64) -> i64 {
    let m: u64 = m % modulus;
    if m >= modulus.div_ceil(2) {
        (m as i128 - modulus as i128) as i64
    } else {
        m as i64
    }
}

/// `i`-th of `n` evenly spaced reals strictly inside `(-bound, bound)`.
pub fn sweep_input(i: usize, n: usize, bound: f64) -> f64 {
    (i + 1) as f64 * 2.0 * bound / (n + 1) as f64 - bound
}
