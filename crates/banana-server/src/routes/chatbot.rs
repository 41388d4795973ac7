use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use banana::{
    codec::{ProtocolFormatter, StreamFormat},
    consumer::Accumulator,
    errors::{RelayError, StreamError},
    models::{event::StreamEvent, message::Message},
    relay::{EventStream, Relay},
    use_case::UseCase,
};
use bytes::Bytes;
use futures::{stream::StreamExt, Stream};
use serde::{Deserialize, Serialize};
use std::{
    pin::Pin,
    str::FromStr,
    task::{Context, Poll},
    time::Duration,
};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tokio_stream::wrappers::ReceiverStream;

/// Optional request header selecting the wire format of the reply
pub const STREAM_FORMAT_HEADER: &str = "x-stream-format";

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<Message>,
}

// Streamed body fed by the relay task; an error item aborts the response
pub struct SseResponse {
    rx: ReceiverStream<Result<String, RelayError>>,
}

impl SseResponse {
    fn new(rx: ReceiverStream<Result<String, RelayError>>) -> Self {
        Self { rx }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, RelayError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx)
            .poll_next(cx)
            .map(|opt| opt.map(|line| line.map(Bytes::from)))
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> axum::response::Response {
        let body = axum::body::Body::from_stream(self);

        (
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            body,
        )
            .into_response()
    }
}

/// The next relay event, or a deadline error once `deadline` has passed
async fn next_event(
    events: &mut EventStream,
    deadline: Instant,
    limit: Duration,
) -> Option<Result<StreamEvent, RelayError>> {
    match timeout_at(deadline, events.next()).await {
        Ok(next) => next,
        Err(_) => Some(Err(RelayError::DeadlineExceeded(limit.as_secs()))),
    }
}

/// Assemble a relay for this request and start the upstream stream
async fn start_reply(
    state: &AppState,
    messages: &[Message],
    deadline: Instant,
) -> Result<EventStream, ApiError> {
    let relay = Relay::from_config(state.relay_config.clone())?;
    match timeout_at(deadline, relay.reply(messages)).await {
        Ok(events) => Ok(events?),
        Err(_) => Err(RelayError::DeadlineExceeded(state.timeout.as_secs()).into()),
    }
}

fn stream_format(headers: &HeaderMap) -> Result<StreamFormat, ApiError> {
    match headers.get(STREAM_FORMAT_HEADER) {
        None => Ok(StreamFormat::default()),
        Some(value) => value
            .to_str()
            .map_err(|e| e.to_string())
            .and_then(StreamFormat::from_str)
            .map_err(ApiError::BadRequest),
    }
}

async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<SseResponse, ApiError> {
    let format = stream_format(&headers)?;
    let deadline = Instant::now() + state.timeout;
    let mut events = start_reply(&state, &request.messages, deadline).await?;

    // Create channel for streaming
    let (tx, rx) = mpsc::channel(100);
    let limit = state.timeout;

    // Spawn task to handle streaming
    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                next = next_event(&mut events, deadline, limit) => next,
                _ = tx.closed() => {
                    tracing::info!("Client disconnected, dropping upstream stream");
                    break;
                }
            };

            match next {
                Some(Ok(event)) => {
                    let line = ProtocolFormatter::format(format, &event);
                    if let Err(e) = tx.send(Ok(line)).await {
                        tracing::error!("Error sending event through channel: {}", e);
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("Relay stream failed: {}", e);
                    let _ = tx.send(Err(e)).await;
                    break;
                }
                None => break,
            }
        }
    });

    Ok(SseResponse::new(ReceiverStream::new(rx)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest {
    prompt: String,
    #[serde(default)]
    use_case: Option<String>,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    response: String,
}

// simple ask for a response, non streaming
async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let prompt = match request.use_case {
        Some(id) => UseCase::from_str(&id)
            .map_err(|_| ApiError::BadRequest(format!("Unknown use case: {}", id)))?
            .prompt(&request.prompt),
        None => request.prompt,
    };

    let deadline = Instant::now() + state.timeout;
    let messages = vec![Message::user().with_text(prompt)];
    let mut events = start_reply(&state, &messages, deadline).await?;

    let mut accumulated = Accumulator::new();
    while let Some(event) = next_event(&mut events, deadline, state.timeout).await {
        accumulated.push(&event?.text_delta);
    }

    match accumulated.finish() {
        Ok(response) => Ok(Json(AskResponse { response })),
        Err(StreamError::EmptyResult) => Err(ApiError::EmptyResult),
        Err(e) => Err(RelayError::Internal(e.to_string()).into()),
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/primitives/chatbot", post(handler))
        .route("/api/primitives/ask", post(ask_handler))
        .with_state(state)
}
