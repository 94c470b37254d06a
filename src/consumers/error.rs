use std::fmt;

/// The error type returned by message handlers.
#[derive(Debug)]
pub struct HandlerError<E> {
    /// The underlying error returned by the message handler.
    pub inner_error: E,
    /// `error_type` distinguishes two classes of errors:
    /// - transient errors; message processing might succeed if retried after a short delay
    /// - fatal errors; no matter how many times you retry, processing will never succeed
    ///
    /// Deliveries are acknowledged automatically, so neither class leads to a redelivery:
    /// the distinction only shows up in the logs.
    pub error_type: ErrorType,
}

impl<E> HandlerError<E> {
    pub fn fatal(inner_error: E) -> Self {
        Self {
            inner_error,
            error_type: ErrorType::Fatal,
        }
    }

    pub fn transient(inner_error: E) -> Self {
        Self {
            inner_error,
            error_type: ErrorType::Transient,
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for HandlerError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner_error)
    }
}

impl<E: fmt::Display> fmt::Display for HandlerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handling of a message failed due to a {} issue: {}",
            self.error_type, self.inner_error
        )
    }
}

/// Types of failure when handling a message.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorType {
    /// Message processing might succeed if retried after a short delay.
    Transient,
    /// Message processing will never succeed, no matter how many times you retry or how long
    /// you wait.
    ///
    /// E.g. the message payload is malformed and cannot be deserialized.
    Fatal,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}
