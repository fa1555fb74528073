use std::fmt;

use crate::error::HarnessError;

/// Real function evaluated under the approximate encoding.
///
/// `odd_symmetry_offset` is the `c` for which `f(-x) - c = -(f(x) - c)`, i.e.
/// the point the function is mirrored around when a variant evaluates it on
/// `|x|` only.
#[derive(Clone, Copy)]
pub struct RealFunction {
    name: &'static str,
    eval: fn(f64) -> f64,
    odd_symmetry_offset: f64,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn sigmoid2(x: f64) -> f64 {
    sigmoid(2.0 * x)
}

fn identity(x: f64) -> f64 {
    x
}

impl RealFunction {
    pub const SIGMOID: RealFunction = RealFunction {
        name: "sigmoid",
        eval: sigmoid,
        odd_symmetry_offset: 0.5,
    };

    /// Sigmoid with a doubled Lipschitz constant.
    pub const SIGMOID2: RealFunction = RealFunction {
        name: "sigmoid2",
        eval: sigmoid2,
        odd_symmetry_offset: 0.5,
    };

    pub const IDENTITY: RealFunction = RealFunction {
        name: "identity",
        eval: identity,
        odd_symmetry_offset: 0.0,
    };

    pub const ALL: [RealFunction; 3] = [RealFunction::SIGMOID, RealFunction::SIGMOID2, RealFunction::IDENTITY];

    pub fn by_name(name: &str) -> Result<RealFunction, HarnessError> {
        RealFunction::ALL
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| HarnessError::UnknownFunction(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn odd_symmetry_offset(&self) -> f64 {
        self.odd_symmetry_offset
    }

    pub fn as_fn(&self) -> fn(f64) -> f64 {
        self.eval
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.eval)(x)
    }

    /// `f` composed `times` times.
    pub fn iterate(&self, x: f64, times: usize) -> f64 {
        (0..times).fold(x, |acc, _| self.eval(acc))
    }
}

impl PartialEq for RealFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for RealFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RealFunction({})", self.name)
    }
}
