//! HTTP front end for the Bedrock streaming relay.
//!
//! Routes browser chat and image-analysis requests to Bedrock and streams
//! the generated text back on the same response.

mod api;
mod config;
mod error;
mod metrics;
mod observability;
mod pages;
mod search;
mod state;

pub use api::{create_router, serve};
pub use config::{
    DEFAULT_CONFIG_FILE, DEFAULT_MAX_BODY_BYTES, LogFormat, SearchConfig, ServerConfig,
};
pub use error::ApiError;
pub use metrics::RelayMetrics;
pub use observability::{
    EXPORTER_ENV, ExporterKind, ObservabilityGuard, init_observability, init_tracing,
};
pub use search::StubSearch;
pub use state::{AppState, StreamSettings};
