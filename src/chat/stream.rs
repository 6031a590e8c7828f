//! Streaming decoder for the upstream event stream
//!
//! Turns a live `text/event-stream` body into an ordered sequence of text
//! fragments. Decoding runs on its own task; fragments flow to the consumer
//! through a bounded channel so a slow consumer applies backpressure, and a
//! parallel capacity-1 channel carries at most one terminal failure.

use crate::chat::session::SessionState;
use crate::types::upstream::{Message, StreamEventPayload};
use crate::{Error, Result};
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::OwnedMutexGuard;

/// Bound on undelivered fragments before the decoder blocks
pub(crate) const FRAGMENT_QUEUE_CAPACITY: usize = 100;

/// Line that terminates the stream successfully
const DONE_LINE: &str = "data: [DONE]";

/// Prefix of event lines carrying a JSON payload
const DATA_PREFIX: &str = "data: ";

/// One observation from a [`ChatStream`]
#[derive(Debug)]
pub enum StreamEvent {
    /// An incremental piece of assistant text, in decode order
    Fragment(String),
    /// Clean end of the stream; all fragments have been delivered
    Done,
    /// Terminal failure; previously delivered fragments stand, but the
    /// conversation history was not updated
    Failed(Error),
}

/// Consumer handle for one streaming turn.
///
/// Finite and not restartable: after [`StreamEvent::Done`] or
/// [`StreamEvent::Failed`] no further fragments arrive. Dropping the handle
/// abandons the turn; the decode task stops and the session records no
/// assistant message.
#[derive(Debug)]
pub struct ChatStream {
    fragments: mpsc::Receiver<String>,
    failure: mpsc::Receiver<Error>,
}

impl ChatStream {
    /// Next fragment, completion, or failure.
    ///
    /// The failure channel is only consulted once the fragment channel is
    /// drained, so the terminal event is never observable before every
    /// decoded fragment has been delivered.
    pub async fn next_event(&mut self) -> StreamEvent {
        match self.fragments.recv().await {
            Some(fragment) => StreamEvent::Fragment(fragment),
            None => match self.failure.try_recv() {
                Ok(error) => StreamEvent::Failed(error),
                Err(_) => StreamEvent::Done,
            },
        }
    }

    /// Drain the stream into the full reply text
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next_event().await {
                StreamEvent::Fragment(fragment) => text.push_str(&fragment),
                StreamEvent::Done => return Ok(text),
                StreamEvent::Failed(error) => return Err(error),
            }
        }
    }
}

/// Spawn the decode task for a successful turn response.
///
/// The task keeps the owned session guard until the turn is fully settled:
/// on clean completion it appends the accumulated reply to the history (if
/// non-empty), on failure it reports once through the error channel and
/// leaves the history untouched. Releasing the guard afterwards is what
/// allows the next turn on the session to start.
pub(crate) fn spawn_turn_decoder(
    response: reqwest::Response,
    mut turn: OwnedMutexGuard<SessionState>,
) -> ChatStream {
    let (fragment_tx, fragment_rx) = mpsc::channel(FRAGMENT_QUEUE_CAPACITY);
    let (failure_tx, failure_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        match decode(response.bytes_stream(), &fragment_tx).await {
            Ok(reply) => {
                if !reply.is_empty() {
                    turn.history.push(Message::assistant(reply));
                }
            }
            Err(error) => {
                tracing::error!("stream decoding failed: {}", error);
                let _ = failure_tx.send(error).await;
            }
        }
    });

    ChatStream {
        fragments: fragment_rx,
        failure: failure_rx,
    }
}

/// Decode a newline-delimited event stream, forwarding each non-empty
/// `message` field as one fragment and returning the accumulated text.
///
/// Individually malformed events are logged and skipped; a read error on
/// the underlying stream is terminal and distinct from the clean `[DONE]`
/// sentinel.
pub(crate) async fn decode<S, B, E>(stream: S, fragments: &mpsc::Sender<String>) -> Result<String>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    futures_util::pin_mut!(stream);
    let mut buffer = String::new();
    let mut accumulated = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::stream_read(e.to_string()))?;
        let text = std::str::from_utf8(chunk.as_ref())
            .map_err(|e| Error::stream_decode(format!("invalid UTF-8 in event stream: {}", e)))?;
        buffer.push_str(text);

        while let Some(pos) = buffer.find('\n') {
            let line = buffer[..pos].trim_end_matches('\r').to_string();
            buffer.drain(..=pos);
            if handle_line(&line, &mut accumulated, fragments).await? == LineOutcome::Finished {
                return Ok(accumulated);
            }
        }
    }

    // The upstream terminates lines with '\n', but a final unterminated
    // event must still be decoded.
    let trailing = std::mem::take(&mut buffer);
    let trailing = trailing.trim_end_matches('\r');
    if !trailing.is_empty() {
        handle_line(trailing, &mut accumulated, fragments).await?;
    }

    Ok(accumulated)
}

#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Finished,
}

async fn handle_line(
    line: &str,
    accumulated: &mut String,
    fragments: &mpsc::Sender<String>,
) -> Result<LineOutcome> {
    if line == DONE_LINE {
        return Ok(LineOutcome::Finished);
    }

    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(LineOutcome::Continue);
    };

    match serde_json::from_str::<StreamEventPayload>(data) {
        Ok(event) if !event.message.is_empty() => {
            accumulated.push_str(&event.message);
            if fragments.send(event.message).await.is_err() {
                // Consumer dropped the stream; abandon the turn.
                return Err(Error::stream_decode("consumer abandoned the stream"));
            }
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("skipping malformed stream event: {}", e),
    }

    Ok(LineOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    type Chunk = std::result::Result<&'static str, std::io::Error>;

    async fn decode_all(chunks: Vec<Chunk>) -> (Result<String>, Vec<String>) {
        let (tx, mut rx) = mpsc::channel(FRAGMENT_QUEUE_CAPACITY);
        let outcome = decode(stream::iter(chunks), &tx).await;
        drop(tx);

        let mut fragments = Vec::new();
        while let Some(fragment) = rx.recv().await {
            fragments.push(fragment);
        }
        (outcome, fragments)
    }

    #[tokio::test]
    async fn test_fragments_and_accumulated_text() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"message\":\"Hel\"}\n"),
            Ok("data: {\"message\":\"lo\"}\n"),
            Ok("data: [DONE]\n"),
        ])
        .await;

        assert_eq!(fragments, vec!["Hel", "lo"]);
        assert_eq!(outcome.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_malformed_event_is_skipped_not_fatal() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {bad json\n"),
            Ok("data: {\"message\":\"ok\"}\n"),
            Ok("data: [DONE]\n"),
        ])
        .await;

        assert_eq!(fragments, vec!["ok"]);
        assert_eq!(outcome.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"mess"),
            Ok("age\":\"Hel\"}\ndata: {\"message\":\"lo\"}\n"),
            Ok("data: [DONE]\n"),
        ])
        .await;

        assert_eq!(fragments, vec!["Hel", "lo"]);
        assert_eq!(outcome.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_empty_message_events_emit_no_fragment() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"message\":\"\"}\n"),
            Ok("data: {\"created\":123}\n"),
            Ok("data: {\"message\":\"hi\"}\n"),
            Ok("data: [DONE]\n"),
        ])
        .await;

        assert_eq!(fragments, vec!["hi"]);
        assert_eq!(outcome.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_read_error_is_terminal_and_distinct() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"message\":\"partial\"}\n"),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
        ])
        .await;

        // Fragments decoded before the failure were already delivered
        assert_eq!(fragments, vec!["partial"]);
        assert!(matches!(outcome.unwrap_err(), Error::StreamRead { .. }));
    }

    #[tokio::test]
    async fn test_stream_end_without_sentinel_keeps_text() {
        // Unterminated trailing line is still decoded
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"message\":\"tail\"}"),
        ])
        .await;

        assert_eq!(fragments, vec!["tail"]);
        assert_eq!(outcome.unwrap(), "tail");
    }

    #[tokio::test]
    async fn test_crlf_lines_decode() {
        let (outcome, fragments) = decode_all(vec![
            Ok("data: {\"message\":\"hi\"}\r\n"),
            Ok("data: [DONE]\r\n"),
        ])
        .await;

        assert_eq!(fragments, vec!["hi"]);
        assert_eq!(outcome.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_chat_stream_orders_events_before_done() {
        let (fragment_tx, fragments) = mpsc::channel(FRAGMENT_QUEUE_CAPACITY);
        let (_failure_tx, failure) = mpsc::channel(1);
        let mut chat_stream = ChatStream { fragments, failure };

        fragment_tx.send("a".to_string()).await.unwrap();
        fragment_tx.send("b".to_string()).await.unwrap();
        drop(fragment_tx);

        assert!(matches!(
            chat_stream.next_event().await,
            StreamEvent::Fragment(f) if f == "a"
        ));
        assert!(matches!(
            chat_stream.next_event().await,
            StreamEvent::Fragment(f) if f == "b"
        ));
        assert!(matches!(chat_stream.next_event().await, StreamEvent::Done));
    }

    #[tokio::test]
    async fn test_chat_stream_reports_failure_after_fragments() {
        let (fragment_tx, fragments) = mpsc::channel(FRAGMENT_QUEUE_CAPACITY);
        let (failure_tx, failure) = mpsc::channel(1);
        let mut chat_stream = ChatStream { fragments, failure };

        fragment_tx.send("a".to_string()).await.unwrap();
        failure_tx
            .send(Error::stream_read("connection reset"))
            .await
            .unwrap();
        drop(fragment_tx);
        drop(failure_tx);

        assert!(matches!(
            chat_stream.next_event().await,
            StreamEvent::Fragment(f) if f == "a"
        ));
        assert!(matches!(
            chat_stream.next_event().await,
            StreamEvent::Failed(Error::StreamRead { .. })
        ));
    }

    #[tokio::test]
    async fn test_collect_text_concatenates_fragments() {
        let (fragment_tx, fragments) = mpsc::channel(FRAGMENT_QUEUE_CAPACITY);
        let (_failure_tx, failure) = mpsc::channel(1);
        let chat_stream = ChatStream { fragments, failure };

        fragment_tx.send("Hel".to_string()).await.unwrap();
        fragment_tx.send("lo".to_string()).await.unwrap();
        drop(fragment_tx);

        assert_eq!(chat_stream.collect_text().await.unwrap(), "Hello");
    }
}
