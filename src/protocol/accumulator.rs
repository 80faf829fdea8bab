use log::{debug, warn};

use super::{Frame, FrameDecoder};
use crate::notes::{extract, ExtractedNotes};

/// How a relay stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The `[DONE]` sentinel was received.
    Done,
    /// The byte stream closed without the sentinel; the text may be cut short.
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub notes: ExtractedNotes,
    pub completion: Completion,
    pub text: String,
}

impl GenerationOutcome {
    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Done
    }
}

/// Raw accumulator for one generation.
///
/// Token contents are concatenated in arrival order and exposed through
/// [`text`](Self::text) for live display; sections are only extracted by
/// [`finish`](Self::finish), once the whole stream is in.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    decoder: FrameDecoder,
    text: String,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk of response bytes. Returns true if the text grew.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        let frames = self.decoder.push(chunk);
        let before = self.text.len();
        for frame in frames {
            self.apply(frame);
        }
        self.text.len() != before
    }

    fn apply(&mut self, frame: Frame) {
        if self.done {
            debug!("Ignoring frame received after [DONE]");
            return;
        }
        match frame {
            Frame::Token { content } => self.text.push_str(&content),
            Frame::Done => self.done = true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn finish(mut self) -> GenerationOutcome {
        if let Some(frame) = self.decoder.finish() {
            self.apply(frame);
        }
        let completion = if self.done {
            Completion::Done
        } else {
            warn!("Stream ended without [DONE] after {} bytes", self.text.len());
            Completion::Truncated
        };
        GenerationOutcome {
            notes: extract(&self.text),
            completion,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenates_tokens_in_order() {
        let mut acc = StreamAccumulator::new();
        assert!(acc.push(Frame::token("DEVELOPER_NOTES: Fixed ").encode().as_bytes()));
        assert!(acc.push(Frame::token("parser\nMARKETING_NOTES: ").encode().as_bytes()));
        assert!(acc.push(Frame::token("Faster").encode().as_bytes()));
        assert_eq!(acc.text(), "DEVELOPER_NOTES: Fixed parser\nMARKETING_NOTES: Faster");

        assert!(!acc.push(Frame::Done.encode().as_bytes()));
        assert!(acc.is_done());

        let outcome = acc.finish();
        assert!(outcome.is_complete());
        assert_eq!(outcome.notes.developer, "Fixed parser");
        assert_eq!(outcome.notes.marketing, "Faster");
    }

    #[test]
    fn test_missing_done_is_truncated() {
        let mut acc = StreamAccumulator::new();
        for token in ["one ", "two ", "three"] {
            acc.push(Frame::token(token).encode().as_bytes());
        }
        let outcome = acc.finish();
        assert_eq!(outcome.completion, Completion::Truncated);
        assert_eq!(outcome.text, "one two three");
        assert_eq!(outcome.notes.developer, "No developer notes generated");
    }

    #[test]
    fn test_frames_after_done_are_ignored() {
        let mut acc = StreamAccumulator::new();
        let wire = format!(
            "{}{}{}",
            Frame::token("a").encode(),
            Frame::Done.encode(),
            Frame::token("b").encode()
        );
        acc.push(wire.as_bytes());
        assert_eq!(acc.text(), "a");
        assert!(acc.finish().is_complete());
    }

    #[test]
    fn test_unterminated_done_still_completes() {
        let mut acc = StreamAccumulator::new();
        acc.push(Frame::token("x").encode().as_bytes());
        acc.push(b"data: [DONE]");
        assert!(acc.finish().is_complete());
    }

    #[test]
    fn test_bad_frame_does_not_stop_accumulation() {
        let mut acc = StreamAccumulator::new();
        acc.push(b"data: not-json\n\n");
        acc.push(Frame::token("kept").encode().as_bytes());
        assert_eq!(acc.text(), "kept");
    }
}
