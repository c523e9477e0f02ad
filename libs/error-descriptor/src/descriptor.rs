//! Immutable error descriptor with copy-on-write updates.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;

use crate::cause::CauseSummary;
use crate::error::DescriptorError;
use crate::exception::DescriptorException;

/// Context key used by [`ErrorDescriptor::with_additional_info`].
pub const ADDITIONAL_INFO_KEY: &str = "Additional information";

/// Ordered string map shared between descriptor copies.
pub type ContextMap = BTreeMap<String, String>;

/// Shared originating failure.
pub type SharedCause = Arc<dyn Error + Send + Sync + 'static>;

/// Structured description of one error occurrence.
///
/// Every `with_*` method borrows the receiver and returns a new descriptor;
/// the receiver is never altered. Context maps are shared between copies and
/// cloned only when one of them is written.
///
/// ```
/// use error_descriptor::catalog::VALUE_NOT_HIGHER_THAN_FIVE;
///
/// let exc = VALUE_NOT_HIGHER_THAN_FIVE
///     .descriptor()
///     .with_additional_info("value=7")
///     .to_exception();
/// assert_eq!(
///     exc.to_string(),
///     "INVALID_INPUT_001 : Value added can't be higher than five"
/// );
/// ```
#[derive(Clone)]
#[must_use]
pub struct ErrorDescriptor {
    code: Arc<str>,
    message: Arc<str>,
    status: StatusCode,
    context: Arc<ContextMap>,
    logged_context: Arc<ContextMap>,
    cause: Option<SharedCause>,
}

impl ErrorDescriptor {
    /// New descriptor with status 400 and no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Arc::from(code.into()),
            message: Arc::from(message.into()),
            status: StatusCode::BAD_REQUEST,
            context: Arc::default(),
            logged_context: Arc::default(),
            cause: None,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// User-visible context, surfaced in responses.
    #[must_use]
    pub fn context(&self) -> &ContextMap {
        &self.context
    }

    /// Log-only context. Never serialized into a response.
    #[must_use]
    pub fn logged_context(&self) -> &ContextMap {
        &self.logged_context
    }

    #[must_use]
    pub fn cause(&self) -> Option<&SharedCause> {
        self.cause.as_ref()
    }

    /// Whether both descriptors describe the same error kind (same code).
    #[must_use]
    pub fn is_same_kind(&self, other: &Self) -> bool {
        self.code == other.code
    }

    /// Whether the status is in the 5xx range.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn with_status(&self, status: StatusCode) -> Self {
        if self.status == status {
            return self.clone();
        }
        Self {
            status,
            ..self.clone()
        }
    }

    /// Numeric form of [`Self::with_status`].
    ///
    /// # Errors
    /// Returns [`DescriptorError::InvalidStatus`] if `status` is outside `100..=999`.
    pub fn with_status_code(&self, status: u16) -> Result<Self, DescriptorError> {
        let status =
            StatusCode::from_u16(status).map_err(|_| DescriptorError::InvalidStatus(status))?;
        Ok(self.with_status(status))
    }

    /// Insert or overwrite `key` in the user-visible context.
    pub fn with_context(&self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let mut context = Arc::clone(&self.context);
        Arc::make_mut(&mut context).insert(key.into(), value.to_string());
        Self {
            context,
            ..self.clone()
        }
    }

    pub fn with_additional_info(&self, value: impl fmt::Display) -> Self {
        self.with_context(ADDITIONAL_INFO_KEY, value)
    }

    /// Insert or overwrite `key` in the log-only context.
    pub fn with_logged_context(&self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let mut logged_context = Arc::clone(&self.logged_context);
        Arc::make_mut(&mut logged_context).insert(key.into(), value.to_string());
        Self {
            logged_context,
            ..self.clone()
        }
    }

    fn with_cause(&self, cause: SharedCause) -> Self {
        Self {
            cause: Some(cause),
            ..self.clone()
        }
    }

    /// Attach `err` as the cause and record its message and kind (plus those
    /// of its immediate source, if any) in the logged context.
    pub fn for_error<E>(&self, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let summary = CauseSummary::new(&err, Some(std::any::type_name::<E>()));
        self.with_summary(Arc::new(err), &summary)
    }

    /// Same as [`Self::for_error`] for a failure that is already shared.
    ///
    /// The concrete type is erased here: well-known std failures keep their
    /// name, anything else is recorded as `Unknown`.
    pub fn for_shared_error(&self, err: SharedCause) -> Self {
        let erased: &(dyn Error + 'static) = err.as_ref();
        let summary = CauseSummary::new(erased, None);
        self.with_summary(err, &summary)
    }

    fn with_summary(&self, cause: SharedCause, summary: &CauseSummary) -> Self {
        summary
            .entries()
            .into_iter()
            .fold(self.with_cause(cause), |acc, (key, value)| {
                acc.with_logged_context(key, value)
            })
    }

    /// Raisable form of this descriptor, chained to its cause if one is set.
    #[must_use]
    pub fn to_exception(&self) -> DescriptorException {
        match &self.cause {
            Some(cause) => DescriptorException::with_cause(self.clone(), Arc::clone(cause)),
            None => DescriptorException::new(self.clone()),
        }
    }

    /// Capture `err` with [`Self::for_error`] and wrap the result.
    #[must_use]
    pub fn to_exception_caused_by<E>(&self, err: E) -> DescriptorException
    where
        E: Error + Send + Sync + 'static,
    {
        self.for_error(err).to_exception()
    }

    /// Like [`Self::to_exception_caused_by`] for call sites holding an optional cause.
    ///
    /// # Errors
    /// Returns [`DescriptorError::MissingCause`] when `err` is `None`.
    pub fn try_to_exception_caused_by<E>(
        &self,
        err: Option<E>,
    ) -> Result<DescriptorException, DescriptorError>
    where
        E: Error + Send + Sync + 'static,
    {
        err.map(|e| self.to_exception_caused_by(e))
            .ok_or_else(|| DescriptorError::MissingCause {
                code: self.code().to_owned(),
            })
    }

    /// Raise this descriptor: `return descriptor.raise();`
    ///
    /// # Errors
    /// Always returns `Err` carrying [`Self::to_exception`].
    pub fn raise<T>(&self) -> Result<T, DescriptorException> {
        Err(self.to_exception())
    }

    /// Raise this descriptor with `err` captured as its cause.
    ///
    /// # Errors
    /// Always returns `Err` carrying [`Self::to_exception_caused_by`].
    pub fn raise_caused_by<T, E>(&self, err: E) -> Result<T, DescriptorException>
    where
        E: Error + Send + Sync + 'static,
    {
        Err(self.to_exception_caused_by(err))
    }
}

impl PartialEq for ErrorDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.code == other.code
            && self.message == other.message
            && self.status == other.status
            && self.context == other.context
            && self.logged_context == other.logged_context
            && same_cause
    }
}

impl fmt::Debug for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDescriptor")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("status", &self.status.as_u16())
            .field("context", &self.context)
            .field("logged_context", &self.logged_context)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .finish()
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.code, self.message)
    }
}
