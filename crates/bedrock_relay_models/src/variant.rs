//! Supported request shapes.

/// The request shape a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestVariant {
    /// Single-turn `{"topic": ...}` wrapped in a Human/Assistant prompt.
    Legacy,
    /// Multi-turn text-only message list.
    Chat,
    /// Multi-turn message list that may carry images.
    Image,
}
