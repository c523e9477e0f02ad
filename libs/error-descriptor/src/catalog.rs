//! Error catalog: static template definitions and an immutable lookup table.

use std::collections::BTreeMap;

use http::StatusCode;

use crate::config::ErrorsConfig;
use crate::descriptor::ErrorDescriptor;
use crate::error::DescriptorError;

/// Static error definition from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub code: &'static str,
    pub message: &'static str,
    pub status: u16,
}

impl ErrDef {
    /// Validation-style template (400 Bad Request).
    #[must_use]
    pub const fn new(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            status: 400,
        }
    }

    #[must_use]
    pub const fn with_status(self, status: u16) -> Self {
        Self { status, ..self }
    }

    /// Materialize this definition as a fresh descriptor.
    #[inline]
    pub fn descriptor(&self) -> ErrorDescriptor {
        // Convert u16 to StatusCode, using INTERNAL_SERVER_ERROR as fallback for invalid codes
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ErrorDescriptor::new(self.code, self.message).with_status(status)
    }
}

pub const GENERAL_ERROR: ErrDef = ErrDef::new("ERROR", "Unknown error");

pub const VALUE_NOT_HIGHER_THAN_FIVE: ErrDef =
    ErrDef::new("INVALID_INPUT_001", "Value added can't be higher than five");

pub const COLOUR_MOOD_MISMATCH: ErrDef = ErrDef::new(
    "INVALID_STATE",
    "You can not have blue as favourite color and be sad",
);

/// Internal failure; elevated to 500 at definition time.
pub const CANNOT_BE_PROCESSED: ErrDef =
    ErrDef::new("INTERNAL_ERROR_001", "Object cannot be processed").with_status(500);

/// Every built-in definition.
pub const BUILTIN: &[ErrDef] = &[
    GENERAL_ERROR,
    VALUE_NOT_HIGHER_THAN_FIVE,
    COLOUR_MOOD_MISMATCH,
    CANNOT_BE_PROCESSED,
];

/// Look up a built-in template by code.
#[must_use]
pub fn builtin(code: &str) -> Option<ErrorDescriptor> {
    BUILTIN
        .iter()
        .find(|def| def.code == code)
        .map(ErrDef::descriptor)
}

/// Immutable code-to-template table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, ErrorDescriptor>,
}

impl Catalog {
    /// Catalog holding only the built-in definitions.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|def| (def.code.to_owned(), def.descriptor()))
            .collect();
        Self { entries }
    }

    /// Built-in definitions plus the entries declared in `config`.
    ///
    /// # Errors
    /// Returns [`DescriptorError::DuplicateCode`] if a configured code is
    /// already present, or [`DescriptorError::InvalidStatus`] for an
    /// unusable status.
    pub fn from_config(config: &ErrorsConfig) -> Result<Self, DescriptorError> {
        let mut catalog = Self::builtin();
        for entry in &config.catalog {
            if catalog.entries.contains_key(&entry.code) {
                return Err(DescriptorError::DuplicateCode(entry.code.clone()));
            }
            let descriptor = ErrorDescriptor::new(entry.code.as_str(), entry.message.as_str())
                .with_status_code(entry.status)?;
            tracing::debug!(code = %entry.code, status = entry.status, "registered catalog entry");
            catalog.entries.insert(entry.code.clone(), descriptor);
        }
        Ok(catalog)
    }

    /// Template for `code`, ready to be specialized by the caller.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<ErrorDescriptor> {
        self.entries.get(code).cloned()
    }

    /// Template for `code`, or the general error when the code is unknown.
    pub fn get_or_general(&self, code: &str) -> ErrorDescriptor {
        self.get(code).unwrap_or_else(|| {
            tracing::warn!(code, "unknown error code, falling back to general error");
            GENERAL_ERROR.descriptor().with_context("code", code)
        })
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
