//! Configuration for the Problem projection and extra catalog entries.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// Prefix of environment variables overriding the configuration.
pub const ENV_PREFIX: &str = "ERRORS__";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ErrorsConfig {
    pub problem: ProblemOptions,
    /// Templates registered in addition to the built-in ones.
    pub catalog: Vec<CatalogEntry>,
}

/// How descriptors are projected into Problem responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProblemOptions {
    /// Base of the problem `type` URI; the code is appended as the last segment.
    /// `None` yields `about:blank`.
    pub type_base_url: Option<String>,
    /// Whether the user-visible context is included in responses.
    pub expose_context: bool,
}

impl Default for ProblemOptions {
    fn default() -> Self {
        Self {
            type_base_url: None,
            expose_context: true,
        }
    }
}

/// One configured catalog template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub code: String,
    pub message: String,
    #[serde(default = "default_status")]
    pub status: u16,
}

fn default_status() -> u16 {
    400
}

impl ErrorsConfig {
    /// Extract the configuration from an already assembled figment.
    ///
    /// # Errors
    /// Returns [`DescriptorError::Config`] if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, DescriptorError> {
        Ok(figment.extract()?)
    }

    /// Defaults, then the optional YAML file, then `ERRORS__*` env vars.
    ///
    /// # Errors
    /// Returns [`DescriptorError::MissingConfigFile`] if `path` is given but
    /// is not a file, and [`DescriptorError::Config`] if the file is malformed
    /// or a value has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self, DescriptorError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(DescriptorError::MissingConfigFile(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "loading error configuration");
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }
}
