//! Decode error types.

/// Malformed inbound request body or malformed upstream chunk payload.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Decode Error: {} at line {} in {}", message, line, file)]
pub struct DecodeError {
    /// What failed to decode and why
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DecodeError {
    /// Create a new DecodeError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_relay_error::DecodeError;
    ///
    /// let err = DecodeError::new("missing field `topic`");
    /// assert!(err.message.contains("topic"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
