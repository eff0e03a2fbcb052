//! Compiler configuration
//!
//! `defaults/matlang.default.yaml` is embedded into the crate so that the
//! documented defaults and runtime behavior stay in sync. Callers layer their
//! own YAML files on top of those defaults via [`Loader`] before deserializing
//! into [`CompilerConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::formats::OutputFormat;
use crate::resources::AssetRegistry;

const DEFAULT_YAML: &str = include_str!("../defaults/matlang.default.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    pub strip_byte_order_mark: bool,
    pub asset_root: Option<PathBuf>,
    pub check_assets_exist: bool,
    pub output_format: OutputFormat,
}

impl Default for CompilerConfig {
    /// Mirrors the embedded defaults file
    fn default() -> Self {
        Self {
            strip_byte_order_mark: true,
            asset_root: None,
            check_assets_exist: false,
            output_format: OutputFormat::Treeviz,
        }
    }
}

impl CompilerConfig {
    /// Resolver honoring `asset_root` and `check_assets_exist`
    pub fn asset_registry(&self) -> AssetRegistry {
        match &self.asset_root {
            Some(root) => AssetRegistry::with_root(root, self.check_assets_exist),
            None if self.check_assets_exist => AssetRegistry::with_root(".", true),
            None => AssetRegistry::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Config(#[from] config::ConfigError),
}

/// Helper for layering user overrides over the built-in defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Layer a YAML document given as text
    pub fn with_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent)
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings)
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration
    pub fn build(self) -> Result<CompilerConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults
pub fn load_defaults() -> Result<CompilerConfig, ConfigError> {
    Loader::new().build()
}

/// Defaults, overlaid with `path` when one is given
pub fn load(path: Option<&Path>) -> Result<CompilerConfig, ConfigError> {
    match path {
        Some(path) => Loader::new().with_file(path).build(),
        None => load_defaults(),
    }
}
