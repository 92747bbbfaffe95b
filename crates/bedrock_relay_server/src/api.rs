//! HTTP routes.

use crate::{ApiError, AppState, pages};
use axum::body::{Body, Bytes};
use axum::extract::rejection::{BytesRejection, FormRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use bedrock_relay_error::{DecodeError, InvocationError, InvocationErrorKind, RelayErrorKind};
use bedrock_relay_interface::SearchQuery;
use bedrock_relay_models::{PayloadFormat, RequestVariant, encode_invocation};
use bedrock_relay_stream::{Relay, channel_sink};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, Span, debug, info, instrument};
use uuid::Uuid;

/// Builds the application router.
///
/// Streaming routes:
/// - `POST /bedrock-stream` - `{"topic"}` against the legacy completion model
/// - `POST /bedrock-haiku` - text-only message list
/// - `POST /claude-haiku-image` - message list that may carry images
///
/// Ancillary routes: `/json`, `/health`, `/query`, `/aoss` and the HTML pages.
///
/// The generation routes accept bodies up to `max_body_bytes`; the rest keep
/// axum's default cap.
pub fn create_router(state: AppState) -> Router {
    let limit = DefaultBodyLimit::max(*state.settings().max_body_bytes());
    Router::new()
        .route("/bedrock-stream", post(bedrock_stream).layer(limit))
        .route("/bedrock-haiku", post(bedrock_haiku).layer(limit))
        .route("/claude-haiku-image", post(claude_haiku_image).layer(limit))
        .route("/json", get(json_greeting))
        .route("/health", get(health))
        .route("/query", post(query))
        .route("/aoss", get(search_page).post(aoss_greeting))
        .route("/", get(chat_page))
        .route("/haiku", get(chat_page))
        .route("/claude2", get(legacy_page))
        .route("/image", get(image_page))
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(addr = %addr, "bedrock-relay listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Turns an extractor failure (oversized or unreadable body) into a JSON error.
fn accept_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))
}

async fn bedrock_stream(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    relay_generation(state, RequestVariant::Legacy, accept_body(body)?).await
}

async fn bedrock_haiku(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    relay_generation(state, RequestVariant::Chat, accept_body(body)?).await
}

async fn claude_haiku_image(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    relay_generation(state, RequestVariant::Image, accept_body(body)?).await
}

/// Translates the body, opens the upstream stream and hands it to a relay task.
///
/// Failures before the stream opens become JSON error responses. After that
/// the status is committed; an upstream failure aborts the body instead.
#[instrument(
    skip(state, body),
    fields(request_id = %Uuid::new_v4(), variant = %variant, body_len = body.len())
)]
async fn relay_generation(
    state: AppState,
    variant: RequestVariant,
    body: Bytes,
) -> Result<Response, ApiError> {
    let metrics = state.metrics().clone();
    metrics.record_request(variant);

    let request = state.translator().translate(variant, &body)?;
    let format = PayloadFormat::of(&request);
    let invocation = encode_invocation(&request)?;

    let settings = state.settings();
    let opened = tokio::time::timeout(
        *settings.invoke_timeout(),
        state.backend().invoke_stream(invocation),
    )
    .await
    .map_err(|_| {
        InvocationError::new(
            InvocationErrorKind::Timeout,
            format!(
                "upstream did not respond within {}s",
                settings.invoke_timeout().as_secs()
            ),
        )
    })
    .and_then(|result| result);
    let events = match opened {
        Ok(events) => events,
        Err(e) => {
            metrics.record_upstream_error(variant);
            return Err(e.into());
        }
    };
    debug!(backend = state.backend().name(), "Upstream stream opened");

    let (mut sink, receiver) =
        channel_sink(*settings.channel_capacity(), *settings.flush_each_fragment());

    tokio::spawn(
        async move {
            let started = Instant::now();
            let mut relay = Relay::new(format);
            let outcome = relay.run(events, &mut sink).await;
            metrics.record_relay(variant, &relay.summary(), started.elapsed());
            if let Err(e) = outcome {
                if let RelayErrorKind::Invocation(upstream) = e.kind() {
                    metrics.record_upstream_error(variant);
                    sink.abort(upstream.message.clone()).await;
                }
            }
        }
        .instrument(Span::current()),
    );

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
        (header::CACHE_CONTROL, "no-cache"),
    ];
    Ok((headers, Body::from_stream(ReceiverStream::new(receiver))).into_response())
}

async fn json_greeting() -> Json<serde_json::Value> {
    Json(json!({ "Message": "Hello" }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "backend": state.backend().name(),
    }))
}

#[instrument(skip_all)]
async fn query(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = accept_body(body)?;
    let query: SearchQuery = serde_json::from_slice(&body)
        .map_err(|e| DecodeError::new(format!("Invalid search query: {}", e)))?;
    let results = state.search().search(query).await?;
    Ok(Json(results).into_response())
}

#[derive(Debug, Deserialize)]
struct GreetingForm {
    #[serde(default)]
    name: String,
}

async fn aoss_greeting(
    form: Result<Form<GreetingForm>, FormRejection>,
) -> Result<String, ApiError> {
    let Form(form) =
        form.map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))?;
    Ok(format!("Hello {}", form.name))
}

async fn chat_page(State(state): State<AppState>) -> Response {
    pages::serve(state.static_dir(), pages::CHAT_PAGE).await
}

async fn legacy_page(State(state): State<AppState>) -> Response {
    pages::serve(state.static_dir(), pages::LEGACY_PAGE).await
}

async fn image_page(State(state): State<AppState>) -> Response {
    pages::serve(state.static_dir(), pages::IMAGE_PAGE).await
}

async fn search_page(State(state): State<AppState>) -> Response {
    pages::serve(state.static_dir(), pages::SEARCH_PAGE).await
}
