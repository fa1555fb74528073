//! Run configuration
//!
//! Loads harness options and additional catalog entries from TOML files.
//!
//! ```toml
//! trials = 64
//! eval_iterations = 2
//! input_mode = "fixed"
//! fixed_input = 1.5
//! seed = 42
//!
//! [[configuration]]
//! desc = "identity, q = 2^11"
//! algorithm = "basic-eval"
//! delta_in = 128.0
//! delta_out = 128.0
//! q_out = 2048
//! function = "identity"
//!
//! [configuration.params]
//! n = 955
//! ring_dim = 2048
//! q = 2048
//! big_q = 9007199254614017
//! q_ks = 33554432
//! std = 3.19
//! base_ks = 32
//! base_g = 134217728
//! beta_precise = 47
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use binfhe::SchemeParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Configuration, RealFunction},
    dispatch::Algorithm,
    error::HarnessError,
    harness::{InputMode, RunOptions},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputModeSetting {
    #[default]
    Sweep,
    Uniform,
    Fixed,
}

/// Harness options plus user-defined configurations appended after the built-in catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub trials: Option<usize>,
    pub eval_iterations: usize,
    pub input_mode: InputModeSetting,
    /// Real input used by every trial when `input_mode = "fixed"`.
    pub fixed_input: Option<f64>,
    pub extracted: bool,
    pub seed: Option<u64>,
    pub lut: Option<Vec<u64>>,
    /// Worker threads of a sweep.
    pub threads: usize,
    #[serde(rename = "configuration")]
    pub configurations: Vec<ConfigurationEntry>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            trials: None,
            eval_iterations: 1,
            input_mode: InputModeSetting::Sweep,
            fixed_input: None,
            extracted: false,
            seed: None,
            lut: None,
            threads: 1,
            configurations: Vec::new(),
        }
    }
}

/// A catalog row as written in a config file; `algorithm` and `function` are given by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationEntry {
    pub desc: String,
    pub algorithm: String,
    #[serde(default)]
    pub p: u64,
    #[serde(default)]
    pub extra: u64,
    #[serde(default)]
    pub delta_in: f64,
    #[serde(default)]
    pub delta_out: f64,
    #[serde(default)]
    pub q_out: u64,
    #[serde(default)]
    pub function: Option<String>,
    pub params: SchemeParams,
}

impl ConfigurationEntry {
    pub fn to_configuration(&self) -> Result<Configuration, HarnessError> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        let function: Option<RealFunction> = self.function.as_deref().map(RealFunction::by_name).transpose()?;
        let configuration: Configuration = Configuration {
            desc: self.desc.clone(),
            algorithm,
            p: self.p,
            extra: self.extra,
            delta_in: self.delta_in,
            delta_out: self.delta_out,
            q_out: self.q_out,
            function,
            params: self.params.clone(),
        };
        configuration.validate()?;
        Ok(configuration)
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content: String = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.eval_iterations == 0 {
            return Err(ConfigError::Invalid("eval_iterations must be at least 1".to_string()));
        }
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1".to_string()));
        }
        if self.input_mode == InputModeSetting::Fixed && self.fixed_input.is_none() {
            return Err(ConfigError::Invalid("input_mode = \"fixed\" needs fixed_input".to_string()));
        }
        Ok(())
    }

    pub fn input_mode(&self) -> InputMode {
        match (self.input_mode, self.fixed_input) {
            (InputModeSetting::Fixed, Some(x)) => InputMode::Fixed(x),
            (InputModeSetting::Uniform, _) => InputMode::Uniform,
            _ => InputMode::Sweep,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            trials: self.trials,
            eval_iterations: self.eval_iterations,
            input_mode: self.input_mode(),
            extracted: self.extracted,
            lut: self.lut.clone(),
            seed: self.seed,
        }
    }

    pub fn user_configurations(&self) -> Result<Vec<Configuration>, HarnessError> {
        self.configurations.iter().map(ConfigurationEntry::to_configuration).collect()
    }
}
