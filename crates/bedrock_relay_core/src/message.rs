//! Message types for conversation history.

use crate::{ContentPart, Role};
use bedrock_relay_error::DecodeError;
use serde::{Deserialize, Serialize};

/// A role-tagged message in a conversation.
///
/// # Examples
///
/// ```
/// use bedrock_relay_core::{ChatMessage, ContentPart, Role};
///
/// let message = ChatMessage::new(Role::User, vec![ContentPart::text("Hello!")]);
///
/// assert_eq!(*message.role(), Role::User);
/// assert_eq!(message.content().len(), 1);
/// assert!(message.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
)]
pub struct ChatMessage {
    /// The role of the message sender
    role: Role,
    /// Ordered content parts (text, image, or pass-through)
    content: Vec<ContentPart>,
}

impl ChatMessage {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// Creates a user message holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// Checks the message invariant: content is non-empty.
    #[track_caller]
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.content.is_empty() {
            return Err(DecodeError::new(format!(
                "{} message has no content parts",
                self.role
            )));
        }
        Ok(())
    }
}
