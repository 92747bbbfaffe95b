//! Trait definitions for the collaborators around the relay.
//!
//! - [`InferenceBackend`] - the upstream streaming model API
//! - [`ChunkSink`] - the downstream client connection
//! - [`SearchService`] - the managed search service behind `/query`

mod backend;
mod search;
mod sink;

pub use backend::{InferenceBackend, ModelInvocation, ModelInvocationBuilder, UpstreamEvent, UpstreamStream};
pub use search::{SearchHit, SearchQuery, SearchResults, SearchService};
pub use sink::ChunkSink;
