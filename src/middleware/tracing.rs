use axum::{extract::Request, middleware::Next, response::Response};
use tracing::field::Empty;
use tracing::Instrument;
use uuid::Uuid;

/// Span field holding the id of the pull request being relayed.
pub const PR_ID: &str = "pr_id";
/// Span field holding the number of token frames relayed downstream.
pub const TOKENS: &str = "tokens";

/// Wraps each request in a span carrying a fresh request id.
///
/// `pr_id` and `tokens` start empty; the generation handler fills them in,
/// and the relay task keeps the span alive until the stream ends.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        pr_id = Empty,
        tokens = Empty,
    );

    async move {
        let response = next.run(request).await;
        tracing::info!(status = %response.status(), "request completed");
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn traced_requests_pass_through() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(trace_requests));

        let resp = app
            .oneshot(axum::http::Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"pong");
    }
}
