//! Structured error descriptors for HTTP services
//!
//! An [`ErrorDescriptor`] is an immutable description of one error: a stable
//! code, a message, an HTTP status, user-visible context, log-only context and
//! an optional originating cause. Updates return new values. A descriptor is
//! raised by turning it into a [`DescriptorException`] and returning it as
//! `Err`.
//!
//! - Error catalog support (`ErrDef`, [`Catalog`])
//! - RFC 9457 Problem Details projection (`Problem`)
//! - Configuration loading (`ErrorsConfig`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod cause;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod exception;
pub mod problem;

// Re-export commonly used types
pub use catalog::{Catalog, ErrDef};
pub use config::{CatalogEntry, ErrorsConfig, ProblemOptions};
pub use descriptor::{ADDITIONAL_INFO_KEY, ErrorDescriptor};
pub use error::DescriptorError;
pub use exception::{DescriptorException, ResultExt};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, finalize};
