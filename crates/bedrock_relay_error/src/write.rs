//! Downstream write error types.

/// Writing or flushing to the client connection failed.
///
/// Usually means the client went away mid-stream.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Write Error: {} at line {} in {}", message, line, file)]
pub struct WriteError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl WriteError {
    /// Create a new WriteError with the given message at the current location.
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
