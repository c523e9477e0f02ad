//! Summaries of originating failures for the log-only context.
//!
//! Only the failure itself and its first `source()` are summarized; deeper
//! chains stay reachable through the stored cause but are not flattened.

use std::error::Error;

use crate::exception::DescriptorException;

/// Logged-context key holding the originating failure's message.
pub const ERROR_MESSAGE_KEY: &str = "exceptionMessage";
/// Logged-context key holding the originating failure's kind.
pub const ERROR_KIND_KEY: &str = "exceptionClass";
/// Logged-context key holding the message of the failure's own source.
pub const CAUSE_MESSAGE_KEY: &str = "exceptionCauseMessage";
/// Logged-context key holding the kind of the failure's own source.
pub const CAUSE_KIND_KEY: &str = "exceptionCauseClass";

/// Placeholder stored when a failure renders an empty message.
pub const MISSING_MESSAGE: &str =
    "Something went wrong fetching the logged context for the thrown error.";

/// Kind reported for a type-erased failure that is not a well-known std type.
pub const UNKNOWN_KIND: &str = "Unknown";

/// Message and kind of a single failure in a cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    pub message: String,
    pub kind: String,
}

/// Two-level summary of an originating failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseSummary {
    pub error: FailureSummary,
    pub source: Option<FailureSummary>,
}

impl CauseSummary {
    /// Summarize `err`. `type_name` is its static type name when the caller
    /// still knows it; the source level is always type-erased.
    pub(crate) fn new(err: &(dyn Error + 'static), type_name: Option<&str>) -> Self {
        Self {
            error: FailureSummary {
                message: message_of(err),
                kind: kind_of(err, type_name),
            },
            source: err.source().map(|src| FailureSummary {
                message: message_of(src),
                kind: kind_of(src, None),
            }),
        }
    }

    /// Flatten into `(key, value)` pairs for the logged context.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            (ERROR_MESSAGE_KEY, self.error.message.clone()),
            (ERROR_KIND_KEY, self.error.kind.clone()),
        ];
        if let Some(src) = &self.source {
            out.push((CAUSE_MESSAGE_KEY, src.message.clone()));
            out.push((CAUSE_KIND_KEY, src.kind.clone()));
        }
        out
    }
}

fn message_of(err: &dyn Error) -> String {
    let msg = err.to_string();
    if msg.trim().is_empty() {
        MISSING_MESSAGE.to_owned()
    } else {
        msg
    }
}

/// Kind of a failure, resolved the same way at every level of the chain:
/// well-known std types first, then the static type name if known, else
/// [`UNKNOWN_KIND`].
pub(crate) fn kind_of(err: &(dyn Error + 'static), type_name: Option<&str>) -> String {
    std_kind(err)
        .map(str::to_owned)
        .or_else(|| type_name.map(short_type_name))
        .unwrap_or_else(|| UNKNOWN_KIND.to_owned())
}

/// Names for std failure types, recognizable behind `dyn Error`.
fn std_kind(err: &(dyn Error + 'static)) -> Option<&'static str> {
    if err.is::<std::io::Error>() {
        Some("io::Error")
    } else if err.is::<std::fmt::Error>() {
        Some("fmt::Error")
    } else if err.is::<std::num::ParseIntError>() {
        Some("ParseIntError")
    } else if err.is::<std::num::ParseFloatError>() {
        Some("ParseFloatError")
    } else if err.is::<std::num::TryFromIntError>() {
        Some("TryFromIntError")
    } else if err.is::<std::str::ParseBoolError>() {
        Some("ParseBoolError")
    } else if err.is::<std::str::Utf8Error>() {
        Some("Utf8Error")
    } else if err.is::<std::string::FromUtf8Error>() {
        Some("FromUtf8Error")
    } else if err.is::<std::net::AddrParseError>() {
        Some("AddrParseError")
    } else if err.is::<std::env::VarError>() {
        Some("VarError")
    } else if err.is::<std::time::SystemTimeError>() {
        Some("SystemTimeError")
    } else if err.is::<DescriptorException>() {
        Some("DescriptorException")
    } else {
        None
    }
}

/// `std::num::ParseIntError` becomes `ParseIntError`; generic arguments are dropped.
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}
