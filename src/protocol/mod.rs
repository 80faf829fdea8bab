//! Line-oriented event framing between the relay and the browser.
//!
//! Every frame is `data: <payload>\n\n`. A token carries a JSON object
//! `{"content": ...}`; the stream is terminated by the literal `data: [DONE]`.

pub mod accumulator;

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

pub use accumulator::{Completion, GenerationOutcome, StreamAccumulator};

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";
pub const DELIMITER: &[u8] = b"\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Token { content: String },
    Done,
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    content: String,
}

impl Frame {
    pub fn token(content: impl Into<String>) -> Self {
        Frame::Token {
            content: content.into(),
        }
    }

    /// The part of the frame that follows `data: `.
    pub fn data(&self) -> String {
        match self {
            Frame::Token { content } => {
                let payload = TokenPayload {
                    content: content.clone(),
                };
                // A struct with a single string field always serializes.
                serde_json::to_string(&payload).unwrap_or_default()
            }
            Frame::Done => DONE_SENTINEL.to_string(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{DATA_PREFIX}{}\n\n", self.data())
    }

    /// Decodes one delimited fragment. Fragments that are not `data:` lines
    /// (comments, keep-alives, blank padding) decode to `None`.
    pub fn decode(fragment: &str) -> Result<Option<Frame>, DecodeError> {
        let fragment = fragment.trim_start_matches(['\r', '\n']);
        let Some(data) = fragment.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };
        let data = data.trim_end_matches(['\r', '\n']);
        if data == DONE_SENTINEL {
            return Ok(Some(Frame::Done));
        }
        let payload: TokenPayload = serde_json::from_str(data)?;
        Ok(Some(Frame::Token {
            content: payload.content,
        }))
    }

    #[cfg(feature = "ssr")]
    pub fn into_event(self) -> Result<axum::response::sse::Event, std::convert::Infallible> {
        Ok(axum::response::sse::Event::default().data(self.data()))
    }
}

/// Splits a byte stream into frames. Bytes of an unfinished frame are kept
/// until the rest of it arrives, so chunk boundaries may fall anywhere,
/// including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    // Bytes before this offset are known not to start a delimiter.
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(end) = self.next_delimiter() {
            let mut fragment: Vec<u8> = self.buffer.drain(..end + DELIMITER.len()).collect();
            fragment.truncate(end);
            self.scanned = 0;
            if let Some(frame) = decode_bytes(fragment) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decodes whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Option<Frame> {
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buffer);
        if rest.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        decode_bytes(rest)
    }

    fn next_delimiter(&mut self) -> Option<usize> {
        let found = self.buffer[self.scanned..]
            .windows(DELIMITER.len())
            .position(|window| window == DELIMITER)
            .map(|offset| self.scanned + offset);
        if found.is_none() {
            self.scanned = self.buffer.len().saturating_sub(DELIMITER.len() - 1);
        }
        found
    }
}

fn decode_bytes(bytes: Vec<u8>) -> Option<Frame> {
    let result = String::from_utf8(bytes)
        .map_err(DecodeError::from)
        .and_then(|fragment| Frame::decode(&fragment));
    match result {
        Ok(frame) => frame,
        Err(e) => {
            error!("Error parsing SSE data: {e}");
            None
        }
    }
}
