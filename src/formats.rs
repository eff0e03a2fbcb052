//! Output format implementations for compiled documents
//!
//! This module contains the serializations of a [`File`] tree:
//! - treeviz, a one line per node rendering with box connectors
//! - JSON and YAML, straight from the serde representation of the tree

pub mod structured;
pub mod treeviz;

pub use structured::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ast::File;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Serializes a compiled document to text
pub trait Formatter {
    fn serialize(&self, file: &File) -> Result<String, FormatError>;
}

/// Built-in output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Treeviz,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Treeviz, OutputFormat::Json, OutputFormat::Yaml];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

impl OutputFormat {
    /// Formatter producing this output
    pub fn formatter(&self) -> &'static dyn Formatter {
        match self {
            OutputFormat::Treeviz => &TreevizFormatter,
            OutputFormat::Json => &JsonFormatter,
            OutputFormat::Yaml => &YamlFormatter,
        }
    }
}

/// Serialize `file` in one of the built-in formats
pub fn serialize(file: &File, format: OutputFormat) -> Result<String, FormatError> {
    format.formatter().serialize(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("YAML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("treeviz".parse::<OutputFormat>(), Ok(OutputFormat::Treeviz));
        assert_eq!(
            "xml".parse::<OutputFormat>(),
            Err(FormatError::FormatNotFound("xml".into()))
        );
    }

    #[test]
    fn test_serialize_dispatches_on_format() {
        let file = File::default();
        assert_eq!(serialize(&file, OutputFormat::Treeviz).unwrap(), to_treeviz_str(&file));
        assert!(serialize(&file, OutputFormat::Json)
            .unwrap()
            .trim_start()
            .starts_with('{'));
        assert!(serialize(&file, OutputFormat::Yaml).unwrap().contains("techniques"));
    }
}
