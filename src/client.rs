//! Browser side of the relay: posts a generation request and reads the
//! frame stream as it arrives.

use js_sys::{Reflect, Uint8Array};
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Request, RequestInit, Response};

use crate::error::{ClientError, ErrorBody};
use crate::protocol::{GenerationOutcome, StreamAccumulator};
use crate::types::GenerationRequest;

pub const GENERATE_NOTES_PATH: &str = "/api/generate-notes";

fn js_error(e: JsValue) -> ClientError {
    ClientError::Request(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// Runs one generation. `on_text` receives the accumulated text every time
/// it grows; sections are extracted once the stream has ended.
///
/// A read failure after the response has started ends the stream like a
/// close would; the outcome is then reported as truncated.
pub async fn stream_notes<F>(
    request: &GenerationRequest,
    mut on_text: F,
) -> Result<GenerationOutcome, ClientError>
where
    F: FnMut(&str),
{
    let window = web_sys::window().ok_or_else(|| ClientError::Request("no window".into()))?;
    let body = serde_json::to_string(request).map_err(|e| ClientError::Request(e.to_string()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let fetch_request = Request::new_with_str_and_init(GENERATE_NOTES_PATH, &init).map_err(js_error)?;
    fetch_request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if !response.ok() {
        return Err(server_error(&response).await);
    }

    let reader: ReadableStreamDefaultReader = response
        .body()
        .ok_or(ClientError::EmptyBody)?
        .get_reader()
        .unchecked_into();

    let mut accumulator = StreamAccumulator::new();
    loop {
        let chunk = match JsFuture::from(reader.read()).await {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Stream read failed for PR {}: {e:?}", request.id);
                break;
            }
        };
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .ok()
            .and_then(|done| done.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }
        let Ok(value) = Reflect::get(&chunk, &JsValue::from_str("value")) else {
            continue;
        };
        if accumulator.push(&Uint8Array::new(&value).to_vec()) {
            on_text(accumulator.text());
        }
    }

    debug!("Stream for PR {} ended", request.id);
    Ok(accumulator.finish())
}

async fn server_error(response: &Response) -> ClientError {
    let fallback = || ClientError::Server {
        error: "Failed to generate release notes".to_string(),
        details: Some(format!("HTTP status {}", response.status())),
    };

    let Ok(promise) = response.text() else {
        return fallback();
    };
    let Some(text) = JsFuture::from(promise).await.ok().and_then(|t| t.as_string()) else {
        return fallback();
    };
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Server {
            error: body.error,
            details: body.details,
        },
        Err(_) => fallback(),
    }
}
