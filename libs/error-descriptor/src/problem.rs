//! RFC 9457 Problem Details projection of a raised descriptor.
//!
//! Only the user-visible context crosses into a Problem. The logged context
//! stays on the descriptor and reaches logs through [`DescriptorException::log`].

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::config::ProblemOptions;
use crate::descriptor::ErrorDescriptor;
use crate::exception::DescriptorException;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Custom serializer for `StatusCode` to u16
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// Custom deserializer for `StatusCode` from u16
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(
    feature = "utoipa",
    schema(
        title = "Problem",
        description = "RFC 9457 Problem Details for HTTP APIs"
    )
)]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// The canonical reason phrase of the status.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    /// Serializes as u16 for RFC 9457 compatibility.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = u16))]
    pub status: StatusCode,
    /// The descriptor message.
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    /// Stable machine-readable error code.
    pub code: String,
    /// Optional trace id useful for tracing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// User-visible context of the descriptor.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl Problem {
    /// Project `descriptor` using `options`.
    pub fn from_descriptor(descriptor: &ErrorDescriptor, options: &ProblemOptions) -> Self {
        let type_url = options.type_base_url.as_deref().map_or_else(
            || "about:blank".to_owned(),
            |base| format!("{}/{}", base.trim_end_matches('/'), descriptor.code()),
        );
        let context = if options.expose_context {
            descriptor.context().clone()
        } else {
            BTreeMap::new()
        };
        Self {
            type_url,
            title: descriptor
                .status()
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_owned(),
            status: descriptor.status(),
            detail: descriptor.message().to_owned(),
            instance: String::new(),
            code: descriptor.code().to_owned(),
            trace_id: None,
            context,
        }
    }

    pub fn from_exception(exc: &DescriptorException, options: &ProblemOptions) -> Self {
        Self::from_descriptor(exc.descriptor(), options)
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }
}

impl From<&DescriptorException> for Problem {
    fn from(exc: &DescriptorException) -> Self {
        Self::from_exception(exc, &ProblemOptions::default())
    }
}

impl From<DescriptorException> for Problem {
    fn from(exc: DescriptorException) -> Self {
        Self::from(&exc)
    }
}

/// Helper to attach instance and `trace_id` to a Problem
pub fn finalize(mut p: Problem, instance: &str, trace_id: Option<String>) -> Problem {
    p = p.with_instance(instance);
    if let Some(tid) = trace_id {
        p = p.with_trace_id(tid);
    }
    p
}

/// Axum integration: make Problem directly usable as a response
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::HeaderValue;

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Raised descriptors returned from handlers are logged, then answered with
/// their Problem projection.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for DescriptorException {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());
        let mut problem = Problem::from(&self);
        if let Some(tid) = trace_id {
            problem = problem.with_trace_id(tid);
        }
        problem.into_response()
    }
}
