//! Configuration loading.
//!
//! `defaults/naturally.default.toml` is embedded into the crate so that the documented
//! defaults and the runtime defaults stay in sync. Callers layer their own files and single
//! key overrides on top of it via [`Loader`] before deserializing into [`NaturallyConfig`].

use crate::flowed::parsing::RecoveryMode;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/naturally.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NaturallyConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub recovery: RecoveryMode,
}

/// Controls how compiled documents are printed.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

/// Options of one [Compiler](crate::flowed::Compiler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    pub recovery: RecoveryMode,
}

impl CompileOptions {
    pub fn tolerant() -> Self {
        Self {
            recovery: RecoveryMode::Tolerant,
        }
    }
}

impl From<&NaturallyConfig> for CompileOptions {
    fn from(config: &NaturallyConfig) -> Self {
        Self {
            recovery: config.parser.recovery,
        }
    }
}

/// Builds a [NaturallyConfig] from the embedded defaults, an optional TOML file and
/// command-line settings, each layer overriding the previous one.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer the TOML file at `path`. [build](Loader::build) fails if it does not exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml));
        self
    }

    pub fn recovery(self, mode: RecoveryMode) -> Result<Self, ConfigError> {
        self.set("parser.recovery", mode.to_string())
    }

    pub fn pretty(self, pretty: bool) -> Result<Self, ConfigError> {
        self.set("output.pretty", pretty)
    }

    fn set(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<NaturallyConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The configuration with nothing layered over the defaults.
pub fn load_defaults() -> Result<NaturallyConfig, ConfigError> {
    Loader::new().build()
}
