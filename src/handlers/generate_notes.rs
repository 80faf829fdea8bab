use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Instrument, Span};

use crate::{
    error::{RelayError, UpstreamError},
    middleware::tracing::{PR_ID, TOKENS},
    protocol::Frame,
    services::{PromptRequest, TokenStream},
    state::RelayState,
    types::GenerationRequest,
};

pub struct FrameStream {
    receiver: mpsc::Receiver<Result<Event, Infallible>>,
}

impl Stream for FrameStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// `POST /api/generate-notes`: relays one generation as a frame stream.
///
/// Failures up to and including the first upstream item are reported as a
/// JSON error. Once frames are flowing, an upstream failure just closes the
/// stream without `[DONE]`.
pub async fn generate_notes(
    State(relay): State<RelayState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Sse<FrameStream>, RelayError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "rejected generation request");
        RelayError::Validation(e.body_text())
    })?;

    let span = Span::current();
    span.record(PR_ID, request.id.as_str());

    if !request.is_valid() {
        warn!("rejected generation request: missing diff");
        return Err(RelayError::missing_diff());
    }

    info!(title = %request.title, "generating notes");

    let prompt = PromptRequest::for_request(&request);
    let mut tokens = relay.backend.open(&prompt).await.map_err(|e| {
        error!(error = %e, "upstream request failed");
        RelayError::from(e)
    })?;

    let first = match tokens.next().await {
        Some(Err(e)) => {
            error!(error = %e, "upstream failed before the first token");
            return Err(e.into());
        }
        first => first,
    };

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(relay_tokens(first, tokens, tx).instrument(span));

    Ok(Sse::new(FrameStream { receiver: rx }))
}

async fn relay_tokens(
    first: Option<Result<String, UpstreamError>>,
    rest: TokenStream,
    tx: mpsc::Sender<Result<Event, Infallible>>,
) {
    let mut tokens = stream::iter(first).chain(rest);
    let mut relayed: u64 = 0;

    while let Some(item) = tokens.next().await {
        match item {
            Ok(content) => {
                if tx.send(Frame::token(content).into_event()).await.is_err() {
                    Span::current().record(TOKENS, relayed);
                    info!(tokens = relayed, "client went away");
                    return;
                }
                relayed += 1;
            }
            Err(e) => {
                Span::current().record(TOKENS, relayed);
                error!(tokens = relayed, error = %e, "upstream stream failed");
                return;
            }
        }
    }

    Span::current().record(TOKENS, relayed);
    debug!(tokens = relayed, "relay finished");
    tx.send(Frame::Done.into_event()).await.ok();
}
