//! Upstream chunks to relay records

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use livecraft_core::stream::{
    decode_record, encode_content_record, RecordFormat, StreamIngestor, DONE_RECORD,
};
use livecraft_types::StreamEvent;

/// Relay `upstream` on a background task.
///
/// Every content delta becomes one `data: {"content": ...}` record. The
/// receiver always ends with `data: [DONE]`, including after a read error.
pub fn spawn_relay<S, B, E>(upstream: S) -> UnboundedReceiver<String>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    let (tx, rx) = mpsc::unbounded();
    tokio::spawn(async move {
        let forwarded = pump(upstream, &tx).await;
        tracing::info!(fragments = forwarded, "Relay finished");
        let _ = tx.unbounded_send(DONE_RECORD.to_string());
    });
    rx
}

async fn pump<S, B, E>(upstream: S, tx: &UnboundedSender<String>) -> usize
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut upstream = Box::pin(upstream);
    let mut ingestor = StreamIngestor::new();
    let mut forwarded = 0;

    while let Some(chunk) = upstream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::error!(error = %e, "Upstream read failed");
                break;
            }
        };

        for record in ingestor.push(chunk) {
            // Upstream `[DONE]` is not forwarded; the relay writes its own
            if let Some(StreamEvent::Content(fragment)) =
                decode_record(&record, RecordFormat::Upstream)
            {
                if tx.unbounded_send(encode_content_record(&fragment)).is_err() {
                    tracing::debug!("Client disconnected");
                    return forwarded;
                }
                forwarded += 1;
            }
        }
    }

    ingestor.finish();
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunk(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    #[tokio::test]
    async fn test_relays_deltas_and_terminates() {
        let body = format!(
            "{}: keep-alive\n\ndata: {{broken\n\n{}data: [DONE]\n\n",
            chunk("Hel"),
            chunk("lo")
        );
        // Split mid-record to exercise reassembly
        let (a, b) = body.split_at(10);
        let upstream = stream::iter(vec![
            Ok::<_, String>(a.to_string()),
            Ok(b.to_string()),
        ]);

        let records: Vec<String> = spawn_relay(upstream).collect().await;
        assert_eq!(
            records,
            vec![
                "data: {\"content\":\"Hel\"}\n\n".to_string(),
                "data: {\"content\":\"lo\"}\n\n".to_string(),
                DONE_RECORD.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_done_after_read_error() {
        let upstream = stream::iter(vec![
            Ok(chunk("partial")),
            Err("connection reset".to_string()),
            Ok(chunk("never")),
        ]);

        let records: Vec<String> = spawn_relay(upstream).collect().await;
        assert_eq!(records.len(), 2);
        assert!(records[0].contains("partial"));
        assert_eq!(records[1], DONE_RECORD);
    }

    #[tokio::test]
    async fn test_empty_upstream_still_terminates() {
        let upstream = stream::iter(Vec::<Result<Vec<u8>, String>>::new());
        let records: Vec<String> = spawn_relay(upstream).collect().await;
        assert_eq!(records, vec![DONE_RECORD.to_string()]);
    }
}
