//! Error types and error handling strategy for completable events.
//!
//! Every failure that leaves [`CompletableEvent::get`] is an [`Error`] with
//! one of a fixed set of [`ErrorKind`]s. Nothing else crosses that boundary.
//!
//! # Error Categories
//!
//! - **Domain**: the producer's work failed with an error callers already
//!   understand (authorization, offsets, fencing, transport). These are
//!   passed through `get` unchanged.
//! - **Internal**: any foreign failure cause, wrapped so that the original
//!   cause stays reachable through [`std::error::Error::source`].
//! - **Wait**: the caller stopped waiting, either because its thread was
//!   interrupted or because its time budget ran out.
//!
//! [`CompletableEvent::get`]: crate::event::CompletableEvent::get

use core::fmt;
use std::sync::Arc;

/// A failure cause stored in a result slot.
///
/// Causes are shared rather than cloned so that every reader of a slot
/// observes the very same cause instance.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // === Domain ===
    /// The client is not authorized for the requested resource.
    Authorization,
    /// A requested offset is out of range or otherwise invalid.
    InvalidOffset,
    /// The topic or partition is not known to the cluster.
    UnknownTopicOrPartition,
    /// An offset commit could not be completed.
    CommitFailed,
    /// This member was fenced by a newer instance.
    Fenced,
    /// The connection to the broker was lost.
    Disconnected,
    /// The broker answered with something the client could not interpret.
    Protocol,
    /// The operation was cancelled by the producer side.
    Cancelled,
    /// User-provided error.
    User,

    // === Internal ===
    /// A foreign failure cause, wrapped.
    Internal,

    // === Wait ===
    /// The waiting thread was interrupted.
    Interrupted,
    /// The time budget was exhausted before the result arrived.
    TimedOut,
}

impl ErrorKind {
    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Authorization
            | Self::InvalidOffset
            | Self::UnknownTopicOrPartition
            | Self::CommitFailed
            | Self::Fenced
            | Self::Disconnected
            | Self::Protocol
            | Self::Cancelled
            | Self::User => ErrorCategory::Domain,
            Self::Internal => ErrorCategory::Internal,
            Self::Interrupted | Self::TimedOut => ErrorCategory::Wait,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Failures produced by the work itself and meaningful to callers.
    Domain,
    /// Wrapped foreign failures.
    Internal,
    /// The caller gave up waiting.
    Wait,
}

/// The main error type for event operations.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Cause>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Adds a source error to the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Adds an already shared source error to the chain, keeping its identity.
    #[must_use]
    pub fn with_cause(mut self, cause: Cause) -> Self {
        self.source = Some(cause);
        self
    }

    /// Returns the wrapped cause, if any, as the shared handle it was stored with.
    #[must_use]
    pub fn cause(&self) -> Option<&Cause> {
        self.source.as_ref()
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Returns true if the waiting thread was interrupted.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self.kind, ErrorKind::Interrupted)
    }

    /// Returns true if the time budget ran out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::TimedOut)
    }

    /// Returns true if this is a wrapped foreign failure.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self.kind, ErrorKind::Internal)
    }

    /// Returns true if this error belongs to the domain category.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self.kind.category(), ErrorCategory::Domain)
    }

    /// Returns this crate's error if `cause` already is one.
    ///
    /// This is the "recognized kind" test applied before a cause leaves
    /// a blocking retrieval: recognized errors pass through unchanged.
    #[must_use]
    pub fn recognize(cause: &Cause) -> Option<Self> {
        cause.downcast_ref::<Self>().cloned()
    }

    /// Wraps a foreign failure cause as an [`ErrorKind::Internal`] error.
    ///
    /// The cause is kept as-is (same `Arc`) and reported by `source()`.
    #[must_use]
    pub fn wrap(cause: Cause) -> Self {
        let message = cause.to_string();
        Self::new(ErrorKind::Internal)
            .with_message(message)
            .with_cause(cause)
    }

    /// Creates an interruption error.
    #[must_use]
    pub fn interrupted() -> Self {
        Self::new(ErrorKind::Interrupted).with_message("interrupted while waiting for event result")
    }

    /// Creates a timeout error recording how long the caller waited.
    #[must_use]
    pub fn timed_out(waited: std::time::Duration) -> Self {
        Self::new(ErrorKind::TimedOut).with_message(format!(
            "event result not available after waiting {}ms",
            waited.as_millis()
        ))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Extension trait for adding context to Results.
#[allow(clippy::result_large_err)]
pub trait ResultExt<T> {
    /// Attach a context message on error.
    fn context(self, msg: impl Into<String>) -> Result<T>;
    /// Attach context message computed lazily on error.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for core::result::Result<T, E> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_message(msg))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().with_message(f()))
    }
}

/// A specialized Result type for event operations.
#[allow(clippy::result_large_err)]
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::time::Duration;

    #[derive(Debug)]
    struct Underlying;

    impl fmt::Display for Underlying {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "underlying")
        }
    }

    impl std::error::Error for Underlying {}

    #[test]
    fn display_without_message() {
        let err = Error::new(ErrorKind::Internal);
        assert_eq!(err.to_string(), "Internal");
    }

    #[test]
    fn display_with_message() {
        let err = Error::new(ErrorKind::CommitFailed).with_message("generation changed");
        assert_eq!(err.to_string(), "CommitFailed: generation changed");
    }

    #[test]
    fn source_chain_is_exposed() {
        let err = Error::new(ErrorKind::User)
            .with_message("outer")
            .with_source(Underlying);
        let source = err.source().expect("source missing");
        assert_eq!(source.to_string(), "underlying");
    }

    #[test]
    fn recognize_accepts_own_errors() {
        let cause: Cause = Arc::new(Error::new(ErrorKind::Fenced).with_message("epoch 7"));
        let recognized = Error::recognize(&cause).expect("own error should be recognized");
        assert_eq!(recognized.kind(), ErrorKind::Fenced);
        assert_eq!(recognized.message(), Some("epoch 7"));
    }

    #[test]
    fn recognize_rejects_foreign_errors() {
        let cause: Cause = Arc::new(Underlying);
        assert!(Error::recognize(&cause).is_none());
    }

    #[test]
    fn wrap_keeps_cause_identity() {
        let cause: Cause = Arc::new(Underlying);
        let err = Error::wrap(Arc::clone(&cause));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(Arc::ptr_eq(err.cause().expect("cause"), &cause));
        assert_eq!(err.to_string(), "Internal: underlying");
    }

    #[test]
    fn wait_constructors() {
        let interrupted = Error::interrupted();
        assert!(interrupted.is_interrupted());
        assert!(!interrupted.is_timeout());

        let timed_out = Error::timed_out(Duration::from_millis(50));
        assert!(timed_out.is_timeout());
        assert!(timed_out.to_string().contains("50ms"));
    }

    #[test]
    fn categories_partition_kinds() {
        assert_eq!(ErrorKind::Authorization.category(), ErrorCategory::Domain);
        assert_eq!(ErrorKind::Internal.category(), ErrorCategory::Internal);
        assert_eq!(ErrorKind::TimedOut.category(), ErrorCategory::Wait);
        assert_eq!(ErrorKind::Interrupted.category(), ErrorCategory::Wait);
        assert!(Error::new(ErrorKind::Protocol).is_domain());
    }

    #[test]
    fn result_ext_adds_message() {
        let res: core::result::Result<(), ErrorKind> = Err(ErrorKind::InvalidOffset);
        let err = res.context("seek failed").expect_err("expected err");
        assert_eq!(err.kind(), ErrorKind::InvalidOffset);
        assert_eq!(err.to_string(), "InvalidOffset: seek failed");
    }
}
