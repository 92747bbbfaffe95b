//! Error types for the bedrock-relay workspace.
//!
//! Every error kind records the source location where it was created. All
//! kinds fold into [`RelayError`] through [`RelayErrorKind`].

mod config;
mod decode;
mod invocation;
mod search;
mod write;

pub use config::ConfigError;
pub use decode::DecodeError;
pub use invocation::{InvocationError, InvocationErrorKind};
pub use search::SearchError;
pub use write::WriteError;

/// Crate-level error variants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From, derive_more::Display)]
pub enum RelayErrorKind {
    /// Malformed inbound body or upstream chunk
    #[display("{_0}")]
    Decode(DecodeError),
    /// Upstream call setup or stream failure
    #[display("{_0}")]
    Invocation(InvocationError),
    /// Client connection write failure
    #[display("{_0}")]
    Write(WriteError),
    /// Configuration error
    #[display("{_0}")]
    Config(ConfigError),
    /// Search backend error
    #[display("{_0}")]
    Search(SearchError),
}

/// Relay error with kind discrimination.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Relay Error: {}", _0)]
pub struct RelayError(Box<RelayErrorKind>);

impl RelayError {
    /// Create a new error from a kind.
    pub fn new(kind: RelayErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RelayErrorKind {
        &self.0
    }

    /// Consume the error and return its kind.
    pub fn into_kind(self) -> RelayErrorKind {
        *self.0
    }
}

impl std::error::Error for RelayError {}

// Generic From implementation for any type that converts to RelayErrorKind
impl<T> From<T> for RelayError
where
    T: Into<RelayErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
