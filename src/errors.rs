// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera session engine
//!
//! Every error raised by the engine carries an [`ErrorKind`], a human readable
//! message and an optional wrapped cause. Causes are either the platform's
//! native failure ([`ProviderError`]) or another [`SessionError`] (for example
//! the previous resolution candidate's failure), and are reachable through
//! [`std::error::Error::source`] so chains can be walked rather than flattened.

use crate::backends::camera::types::ProviderError;
use std::fmt;
use thiserror::Error;

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Classification of engine failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Camera or microphone access refused
    PermissionDenied,
    /// No matching or available device
    DeviceNotFound,
    /// Resolution negotiation was overconstrained
    ResolutionUnsupported,
    /// Hardware already claimed by another consumer
    DeviceBusy,
    /// Acquisition or live constraint application failed
    StreamError,
    /// Frame draw or image encoding failed
    CaptureFailed,
    /// Operation attempted before a configuration was supplied
    NotInitialized,
    /// Another session-mutating operation is already in flight
    ConcurrentOperation,
    /// Operation attempted after the session was disposed
    Disposed,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Stable identifier, useful for logs and serialized diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::DeviceNotFound => "device-not-found",
            ErrorKind::ResolutionUnsupported => "resolution-unsupported",
            ErrorKind::DeviceBusy => "device-busy",
            ErrorKind::StreamError => "stream-error",
            ErrorKind::CaptureFailed => "capture-failed",
            ErrorKind::NotInitialized => "not-initialized",
            ErrorKind::ConcurrentOperation => "concurrent-operation",
            ErrorKind::Disposed => "disposed",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ProviderError> for ErrorKind {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::NotAllowed(_) => ErrorKind::PermissionDenied,
            ProviderError::NotFound(_) => ErrorKind::DeviceNotFound,
            ProviderError::Overconstrained { .. } => ErrorKind::ResolutionUnsupported,
            ProviderError::NotReadable(_) => ErrorKind::DeviceBusy,
            ProviderError::Unsupported(_) | ProviderError::Aborted(_) | ProviderError::Other(_) => {
                ErrorKind::StreamError
            }
        }
    }
}

/// The wrapped cause of a [`SessionError`]
#[derive(Debug, Clone, Error)]
pub enum ErrorCause {
    /// Native failure reported by the capture provider
    #[error(transparent)]
    Platform(#[from] ProviderError),
    /// An earlier engine error (e.g. a failed resolution candidate)
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Main engine error type
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct SessionError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Box<ErrorCause>>,
}

impl SessionError {
    /// Create an error without a cause
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach a wrapped cause
    pub fn with_cause(mut self, cause: impl Into<ErrorCause>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    /// Wrap a provider failure, classifying it by the provider's error kind
    pub fn from_provider(err: ProviderError, context: impl Into<String>) -> Self {
        Self::new(ErrorKind::from(&err), context).with_cause(err)
    }

    pub fn not_initialized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotInitialized, message)
    }

    pub fn concurrent_operation(operation: &str) -> Self {
        Self::new(
            ErrorKind::ConcurrentOperation,
            format!("cannot {operation}: another session operation is in progress"),
        )
    }

    pub fn disposed() -> Self {
        Self::new(ErrorKind::Disposed, "camera session has been disposed")
    }

    pub fn capture_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CaptureFailed, message)
    }

    pub fn stream_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StreamError, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The directly wrapped cause, if any
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_deref()
    }

    /// The wrapped engine error, if the cause is another [`SessionError`]
    pub fn inner_session_error(&self) -> Option<&SessionError> {
        match self.cause.as_deref() {
            Some(ErrorCause::Session(inner)) => Some(inner),
            _ => None,
        }
    }

    /// The innermost provider failure in the chain, if any
    pub fn platform_error(&self) -> Option<&ProviderError> {
        let mut current = self;
        loop {
            match current.cause.as_deref() {
                Some(ErrorCause::Platform(err)) => return Some(err),
                Some(ErrorCause::Session(inner)) => current = inner,
                None => return None,
            }
        }
    }

    /// Iterate over this error and every engine error it wraps, outermost first
    pub fn session_chain(&self) -> impl Iterator<Item = &SessionError> {
        std::iter::successors(Some(self), |err| err.inner_session_error())
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        Self::from_provider(err, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_provider_error_classification() {
        assert_eq!(
            ErrorKind::from(&ProviderError::NotAllowed("denied".into())),
            ErrorKind::PermissionDenied
        );
        assert_eq!(
            ErrorKind::from(&ProviderError::NotReadable("in use".into())),
            ErrorKind::DeviceBusy
        );
        assert_eq!(
            ErrorKind::from(&ProviderError::Overconstrained {
                constraint: "width".into()
            }),
            ErrorKind::ResolutionUnsupported
        );
        assert_eq!(
            ErrorKind::from(&ProviderError::Other("boom".into())),
            ErrorKind::StreamError
        );
    }

    #[test]
    fn test_chain_is_inspectable() {
        let platform = ProviderError::Overconstrained {
            constraint: "height".into(),
        };
        let candidate = SessionError::from_provider(platform, "candidate 640x480 failed");
        let outer = SessionError::new(ErrorKind::ResolutionUnsupported, "all candidates failed")
            .with_cause(candidate);

        let chain: Vec<_> = outer.session_chain().map(|e| e.message().to_string()).collect();
        assert_eq!(chain, vec!["all candidates failed", "candidate 640x480 failed"]);

        assert!(matches!(
            outer.platform_error(),
            Some(ProviderError::Overconstrained { .. })
        ));
        assert!(outer.source().is_some());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = SessionError::not_initialized("no configuration");
        assert_eq!(err.to_string(), "not-initialized: no configuration");
    }
}
