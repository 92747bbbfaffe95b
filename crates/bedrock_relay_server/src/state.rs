//! Shared handler state.

use crate::{RelayMetrics, ServerConfig};
use bedrock_relay_interface::{InferenceBackend, SearchService};
use bedrock_relay_models::Translator;
use derive_getters::Getters;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-request streaming parameters.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct StreamSettings {
    /// Bound on opening the upstream stream
    invoke_timeout: Duration,
    /// Frames buffered between relay task and body
    channel_capacity: usize,
    /// Send every fragment as its own frame
    flush_each_fragment: bool,
    /// Request body cap on the generation routes
    max_body_bytes: usize,
}

/// State cloned into every handler.
///
/// Holds no per-request data; each request builds its own relay.
#[derive(Clone, Getters)]
pub struct AppState {
    backend: Arc<dyn InferenceBackend>,
    search: Arc<dyn SearchService>,
    translator: Arc<Translator>,
    metrics: RelayMetrics,
    settings: Arc<StreamSettings>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    /// Builds handler state from configuration and collaborators.
    pub fn new(
        config: &ServerConfig,
        backend: Arc<dyn InferenceBackend>,
        search: Arc<dyn SearchService>,
    ) -> Self {
        Self {
            backend,
            search,
            translator: Arc::new(Translator::new(config.models().clone())),
            metrics: RelayMetrics::new(),
            settings: Arc::new(StreamSettings {
                invoke_timeout: config.invoke_timeout(),
                channel_capacity: *config.channel_capacity(),
                flush_each_fragment: *config.flush_each_fragment(),
                max_body_bytes: *config.max_body_bytes(),
            }),
            static_dir: Arc::new(config.static_dir().clone()),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend.name())
            .field("settings", &self.settings)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
