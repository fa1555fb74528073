//! Read-only catalogs of named evaluation configurations.
//!
//! Entries are addressed by a flat index running over all sections; section
//! titles are only printed between entries and can never be selected.

mod decomposition;
mod eval_func;
mod function;

use std::{fmt, sync::LazyLock};

use binfhe::{FuncEncoding, SchemeParams};

pub use decomposition::{DecompositionConfiguration, ReluConfiguration, decomposition_catalog, relu_catalog};
pub use function::RealFunction;

use crate::{dispatch::Algorithm, error::HarnessError};

pub const Q53: u64 = 9007199254614017;
pub const P53: u64 = 9007199254781953;
pub const Q26: u64 = 67104769;

pub const N35: u32 = 1340;
pub const N25: u32 = 955;
pub const N20: u32 = 760;

/// One catalog row: an algorithm, its encoding and the scheme parameters it runs with.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub desc: String,
    pub algorithm: Algorithm,
    /// Plaintext modulus, 0 for the approximate encoding.
    pub p: u64,
    /// Midpoint for pre-select, odd-symmetry flag for compare.
    pub extra: u64,
    pub delta_in: f64,
    pub delta_out: f64,
    pub q_out: u64,
    pub function: Option<RealFunction>,
    pub params: SchemeParams,
}

impl Configuration {
    pub fn discrete(desc: &str, algorithm: Algorithm, p: u64, params: SchemeParams) -> Self {
        Configuration {
            desc: desc.to_string(),
            algorithm,
            p,
            extra: 0,
            delta_in: 0.0,
            delta_out: 0.0,
            q_out: 0,
            function: None,
            params,
        }
    }

    pub fn approximate(
        desc: &str,
        algorithm: Algorithm,
        (delta_in, delta_out, q_out): (f64, f64, u64),
        function: RealFunction,
        params: SchemeParams,
    ) -> Self {
        Configuration {
            desc: desc.to_string(),
            algorithm,
            p: 0,
            extra: 0,
            delta_in,
            delta_out,
            q_out,
            function: Some(function),
            params,
        }
    }

    pub fn with_extra(mut self, extra: u64) -> Self {
        self.extra = extra;
        self
    }

    pub fn is_discrete(&self) -> bool {
        self.p > 0
    }

    pub fn encoding(&self) -> FuncEncoding {
        FuncEncoding {
            delta_in: self.delta_in,
            delta_out: self.delta_out,
            q_out: self.q_out,
            function: self.function.map(|f| f.as_fn()),
        }
    }

    /// Parameters the context for this configuration is generated with.
    pub fn context_params(&self) -> SchemeParams {
        self.params.clone().with_plaintext_modulus(self.p)
    }

    /// Checks that exactly one of the discrete and approximate encodings is set up.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.is_discrete() {
            if self.function.is_some() {
                return Err(HarnessError::invalid(&self.desc, "a discrete configuration cannot carry a function"));
            }
            return Ok(());
        }
        if self.function.is_none() {
            return Err(HarnessError::invalid(&self.desc, "an approximate configuration needs a function"));
        }
        if !(self.delta_in > 0.0 && self.delta_out > 0.0) {
            return Err(HarnessError::invalid(&self.desc, "scale factors must be positive"));
        }
        if self.q_out < 2 {
            return Err(HarnessError::invalid(&self.desc, "output modulus must be at least 2"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Section {
    pub title: String,
    pub entries: Vec<Configuration>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    sections: Vec<Section>,
}

static FUNCTION_EVALUATION: LazyLock<Catalog> = LazyLock::new(eval_func::build);

impl Catalog {
    /// Built-in functional-bootstrapping configurations.
    pub fn function_evaluation() -> &'static Catalog {
        &FUNCTION_EVALUATION
    }

    pub fn new(sections: Vec<Section>) -> Self {
        Catalog { sections }
    }

    pub fn with_section(mut self, title: &str, entries: Vec<Configuration>) -> Self {
        if !entries.is_empty() {
            self.sections.push(Section {
                title: title.to_string(),
                entries,
            });
        }
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<&Configuration, HarnessError> {
        self.iter()
            .nth(index)
            .map(|(_, configuration)| configuration)
            .ok_or(HarnessError::IndexOutOfRange { index, len: self.len() })
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Configuration)> {
        self.sections.iter().flat_map(|s| s.entries.iter()).enumerate()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut index: usize = 0;
        for section in &self.sections {
            writeln!(f, "{:*^100}", format!(" {} ", section.title))?;
            for configuration in &section.entries {
                writeln!(f, "{index}: {}", configuration.desc)?;
                index += 1;
            }
        }
        Ok(())
    }
}

pub(crate) fn lookup<T>(entries: &[T], index: usize) -> Result<&T, HarnessError> {
    entries.get(index).ok_or(HarnessError::IndexOutOfRange {
        index,
        len: entries.len(),
    })
}
