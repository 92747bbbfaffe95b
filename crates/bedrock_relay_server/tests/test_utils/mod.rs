//! Test utilities for relay server tests.
//!
//! Provides a scripted inference backend and a helper that serves the router
//! on an ephemeral port.

#![allow(dead_code)]

use async_trait::async_trait;
use bedrock_relay_error::{InvocationError, InvocationErrorKind};
use bedrock_relay_interface::{InferenceBackend, ModelInvocation, UpstreamEvent, UpstreamStream};
use bedrock_relay_server::{AppState, ServerConfig, StubSearch, create_router};
use bytes::Bytes;
use futures_util::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How the mock backend answers an invocation.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Open a stream yielding these events, then end.
    Script(Vec<Result<UpstreamEvent, InvocationError>>),
    /// Reject the call before any stream opens.
    Reject(InvocationError),
    /// Never resolve the call.
    Hang,
    /// Yield up to `limit` text deltas, one per `interval`, counting each one
    /// the relay pulls.
    Slow { interval: Duration, limit: usize },
}

/// Inference backend returning scripted events and recording invocations.
#[derive(Debug, Clone)]
pub struct MockBackend {
    behavior: MockBehavior,
    invocations: Arc<Mutex<Vec<ModelInvocation>>>,
    pulled: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            invocations: Arc::new(Mutex::new(Vec::new())),
            pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Streams each fragment as a messages-API text delta.
    pub fn messages(fragments: &[&str]) -> Self {
        Self::new(MockBehavior::Script(
            fragments.iter().map(|f| Ok(messages_delta(f))).collect(),
        ))
    }

    /// Streams each fragment as a text-completion chunk.
    pub fn completion(fragments: &[&str]) -> Self {
        Self::new(MockBehavior::Script(
            fragments.iter().map(|f| Ok(completion_chunk(f))).collect(),
        ))
    }

    /// Invocations received so far.
    pub fn invocations(&self) -> Vec<ModelInvocation> {
        self.invocations.lock().expect("invocations lock").clone()
    }

    /// Events pulled from a `Slow` stream so far.
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn invoke_stream(
        &self,
        invocation: ModelInvocation,
    ) -> Result<UpstreamStream, InvocationError> {
        self.invocations
            .lock()
            .expect("invocations lock")
            .push(invocation);
        match &self.behavior {
            MockBehavior::Script(events) => Ok(futures_util::stream::iter(events.clone()).boxed()),
            MockBehavior::Reject(err) => Err(err.clone()),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(InvocationError::new(InvocationErrorKind::Call, "unreachable"))
            }
            MockBehavior::Slow { interval, limit } => {
                let (interval, limit) = (*interval, *limit);
                let pulled = self.pulled.clone();
                let events = futures_util::stream::unfold(0usize, move |n| {
                    let pulled = pulled.clone();
                    async move {
                        if n >= limit {
                            return None;
                        }
                        tokio::time::sleep(interval).await;
                        pulled.fetch_add(1, Ordering::SeqCst);
                        Some((Ok(messages_delta(&format!("token{} ", n))), n + 1))
                    }
                });
                Ok(events.boxed())
            }
        }
    }
}

/// A `content_block_delta` event carrying `text`.
pub fn messages_delta(text: &str) -> UpstreamEvent {
    let payload = serde_json::json!({
        "type": "content_block_delta",
        "index": 0,
        "delta": { "type": "text_delta", "text": text },
    });
    UpstreamEvent::Chunk(Bytes::from(payload.to_string()))
}

/// A legacy completion chunk carrying `text`.
pub fn completion_chunk(text: &str) -> UpstreamEvent {
    let payload = serde_json::json!({ "completion": text, "stop_reason": null });
    UpstreamEvent::Chunk(Bytes::from(payload.to_string()))
}

/// The repository's static page directory.
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../static")
}

/// Default test configuration pointed at the repository's pages.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_toml(&format!("static_dir = {:?}", static_dir().display().to_string()))
        .expect("valid test configuration")
}

/// Serves the router on an ephemeral port and returns its base URL.
pub async fn spawn_server(config: &ServerConfig, backend: MockBackend) -> String {
    let state = AppState::new(
        config,
        Arc::new(backend),
        Arc::new(StubSearch::new(config.search().default_index())),
    );
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server runs");
    });
    format!("http://{}", addr)
}
