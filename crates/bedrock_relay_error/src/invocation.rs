//! Upstream invocation error types.

/// Specific upstream failure conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InvocationErrorKind {
    /// Building or serializing the outbound request failed.
    #[display("request setup")]
    Setup,
    /// The upstream call was rejected or could not be sent.
    #[display("call")]
    Call,
    /// The upstream call did not open a stream in time.
    #[display("timeout")]
    Timeout,
    /// The event stream failed after it was opened.
    #[display("stream")]
    Stream,
}

/// Upstream call setup or streaming failure.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invocation Error ({}): {} at line {} in {}", kind, message, line, file)]
pub struct InvocationError {
    /// Failure stage
    pub kind: InvocationErrorKind,
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvocationError {
    /// Create a new InvocationError of the given kind at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_relay_error::{InvocationError, InvocationErrorKind};
    ///
    /// let err = InvocationError::new(InvocationErrorKind::Call, "AccessDeniedException");
    /// assert_eq!(err.kind, InvocationErrorKind::Call);
    /// ```
    #[track_caller]
    pub fn new(kind: InvocationErrorKind, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
