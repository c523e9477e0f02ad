//! Raisable carrier for an [`ErrorDescriptor`].

use std::error::Error;
use std::fmt;

use http::StatusCode;

use crate::descriptor::{ErrorDescriptor, SharedCause};

/// An [`ErrorDescriptor`] in raisable form.
///
/// Renders as `"<code> : <message>"` and exposes the originating failure, if
/// any, through [`Error::source`].
#[derive(Debug)]
pub struct DescriptorException {
    descriptor: ErrorDescriptor,
    source: Option<SharedCause>,
}

impl DescriptorException {
    #[must_use]
    pub fn new(descriptor: ErrorDescriptor) -> Self {
        Self {
            descriptor,
            source: None,
        }
    }

    #[must_use]
    pub fn with_cause(descriptor: ErrorDescriptor, cause: SharedCause) -> Self {
        Self {
            descriptor,
            source: Some(cause),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ErrorDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn into_descriptor(self) -> ErrorDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.descriptor.code()
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.descriptor.status()
    }

    /// Emit the log-only context as a single `tracing` event.
    ///
    /// Server errors are logged at `error`, everything else at `warn`. The
    /// logged context is recorded as a map, so values containing `,` or `=`
    /// stay unambiguous.
    pub fn log(&self) {
        let d = &self.descriptor;
        let logged = d.logged_context();
        let source = self.source.as_ref().map(ToString::to_string);
        if d.is_server_error() {
            tracing::error!(
                code = %d.code(),
                status = d.status().as_u16(),
                logged_context = ?logged,
                source = ?source,
                "{}", d.message()
            );
        } else {
            tracing::warn!(
                code = %d.code(),
                status = d.status().as_u16(),
                logged_context = ?logged,
                source = ?source,
                "{}", d.message()
            );
        }
    }
}

impl fmt::Display for DescriptorException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.descriptor.code(), self.descriptor.message())
    }
}

impl Error for DescriptorException {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<ErrorDescriptor> for DescriptorException {
    fn from(descriptor: ErrorDescriptor) -> Self {
        descriptor.to_exception()
    }
}

/// Convert arbitrary failures into a descriptor's raisable form.
///
/// ```
/// use error_descriptor::{ErrorDescriptor, ResultExt};
///
/// let bad = ErrorDescriptor::new("PARSE_001", "Not a number");
/// let err = "seven".parse::<u8>().or_raise(&bad).unwrap_err();
/// assert_eq!(err.to_string(), "PARSE_001 : Not a number");
/// ```
pub trait ResultExt<T> {
    /// Replace the error with `descriptor`, capturing it as the cause.
    ///
    /// # Errors
    /// Returns the converted [`DescriptorException`] when `self` is `Err`.
    fn or_raise(self, descriptor: &ErrorDescriptor) -> Result<T, DescriptorException>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn or_raise(self, descriptor: &ErrorDescriptor) -> Result<T, DescriptorException> {
        self.map_err(|e| descriptor.to_exception_caused_by(e))
    }
}
