//! Shared configuration loader for the sncl toolchain.
//!
//! `defaults/sncl.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`SnclConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use sncl_parser::CompileOptions;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/sncl.default.toml");

/// Name of the optional per-directory configuration file.
pub const USER_CONFIG_FILE: &str = "sncl.toml";

/// Top-level configuration consumed by sncl applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SnclConfig {
    pub compiler: CompilerConfig,
    pub logging: LoggingConfig,
}

/// Knobs handed to the compiler for every file.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    pub max_macro_depth: usize,
    pub indent_string: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl SnclConfig {
    /// The library-side view of the compiler settings.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            max_macro_depth: self.compiler.max_macro_depth,
            indent: self.compiler.indent_string.clone(),
        }
    }
}

/// Builds a [`SnclConfig`] from the embedded defaults plus whatever the caller
/// layers on top, in order: config files, then single-key overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the embedded `sncl.default.toml` so far.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist, such as the one named by `--config`.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a TOML file that may be missing, such as the `sncl.toml` beside a source.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `compiler.max_macro_depth`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers; unknown keys are ignored, missing ones fall back to the defaults.
    pub fn build(self) -> Result<SnclConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The configuration a compile gets when no file is layered on top.
pub fn load_defaults() -> Result<SnclConfig, ConfigError> {
    Loader::new().build()
}
