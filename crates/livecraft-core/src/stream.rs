//! Stream ingestion: chunked bytes to newline-delimited records to events

use crate::error::{CoreError, Result};
use futures::{Stream, StreamExt};
use livecraft_types::StreamEvent;

const DATA_PREFIX: &str = "data: ";
const DONE_PAYLOAD: &str = "[DONE]";

/// Termination record written by the relay
pub const DONE_RECORD: &str = "data: [DONE]\n\n";

/// Reassembles arbitrarily split fragments into complete lines.
///
/// The pending partial line is kept as bytes so a fragment boundary inside
/// a multi-byte UTF-8 sequence decodes correctly once the line completes.
#[derive(Debug, Default)]
pub struct StreamIngestor {
    pending: Vec<u8>,
}

impl StreamIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return every line it completed, in order
    pub fn push(&mut self, fragment: impl AsRef<[u8]>) -> Vec<String> {
        self.pending.extend_from_slice(fragment.as_ref());

        let mut records = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            records.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end + 1;
        }
        self.pending.drain(..start);
        records
    }

    /// Bytes of the current partial line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of stream. An unterminated trailing line is discarded.
    pub fn finish(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(bytes = self.pending.len(), "Discarding unterminated record");
            self.pending.clear();
        }
    }
}

/// Payload shape of `data:` records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    /// `{"content": "..."}` as emitted by the relay
    Relay,
    /// OpenAI-compatible chunks, `choices[0].delta.content`
    Upstream,
}

/// Decode one record. Blank lines, non-data lines, malformed JSON and
/// empty fragments all yield `None`.
pub fn decode_record(record: &str, format: RecordFormat) -> Option<StreamEvent> {
    let payload = record.trim().strip_prefix(DATA_PREFIX)?;
    let payload = payload.trim();
    if payload == DONE_PAYLOAD {
        return Some(StreamEvent::Done);
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping malformed record");
            return None;
        }
    };

    let content = match format {
        RecordFormat::Relay => value.get("content"),
        RecordFormat::Upstream => value.pointer("/choices/0/delta/content"),
    }?
    .as_str()?;

    if content.is_empty() {
        None
    } else {
        Some(StreamEvent::Content(content.to_string()))
    }
}

/// Encode a content fragment as a relay record
pub fn encode_content_record(content: &str) -> String {
    format!(
        "{}{}\n\n",
        DATA_PREFIX,
        serde_json::json!({ "content": content })
    )
}

/// Result of draining a response stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// All fragments concatenated in arrival order
    pub content: String,
    /// Records that produced content
    pub records: usize,
    /// Records that were ignored
    pub skipped: usize,
    /// Whether the `[DONE]` sentinel was seen
    pub terminated: bool,
}

/// Drain a byte stream, calling `on_progress` with the accumulated text
/// after every content fragment.
///
/// A read error discards any partial record and surfaces as
/// `CoreError::Transport`.
pub async fn drive<S, B, E, F>(
    mut stream: S,
    format: RecordFormat,
    mut on_progress: F,
) -> Result<StreamOutcome>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    F: FnMut(&str),
{
    let mut ingestor = StreamIngestor::new();
    let mut outcome = StreamOutcome::default();

    'read: while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                ingestor.finish();
                return Err(CoreError::Transport(e.to_string()));
            }
        };

        for record in ingestor.push(chunk) {
            match decode_record(&record, format) {
                Some(StreamEvent::Content(fragment)) => {
                    outcome.records += 1;
                    outcome.content.push_str(&fragment);
                    on_progress(&outcome.content);
                }
                Some(StreamEvent::Done) => {
                    outcome.terminated = true;
                    break 'read;
                }
                None => {
                    if !record.trim().is_empty() {
                        outcome.skipped += 1;
                    }
                }
            }
        }
    }

    ingestor.finish();
    tracing::debug!(
        records = outcome.records,
        skipped = outcome.skipped,
        terminated = outcome.terminated,
        "Stream drained"
    );
    Ok(outcome)
}
