//! Errors produced by this crate itself (as opposed to the descriptors it carries).

use std::path::PathBuf;

use thiserror::Error;

/// Failures of descriptor construction, catalog assembly and config loading.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// A cause was required to build the exception but none was supplied.
    #[error("descriptor '{code}' was raised with a cause, but the cause is missing")]
    MissingCause { code: String },

    /// The numeric status is not a valid HTTP status code.
    #[error("invalid HTTP status code: {0}")]
    InvalidStatus(u16),

    /// Two catalog entries share the same code.
    #[error("duplicate error code in catalog: {0}")]
    DuplicateCode(String),

    /// An explicitly requested configuration file does not exist.
    #[error("error configuration file not found: {}", .0.display())]
    MissingConfigFile(PathBuf),

    /// The configuration could not be extracted.
    #[error("invalid error configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for DescriptorError {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}
