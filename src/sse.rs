//! Server-Sent Events (SSE) line processing for streamed chat completions.
//!
//! SSE format:
//! ```text
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```
//!
//! [`process_line`] is the single per-line step; the async stream adapter and
//! the blocking iterator both drive it.

use std::io::BufRead;
use std::marker::PhantomData;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;

use crate::client::ClientError;

const DATA_PREFIX: &[u8] = b"data: ";

/// Outcome of one `data:` line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent<T> {
    Data(T),
    Done,
}

/// Parse an SSE line to extract the data portion.
///
/// # Example
/// ```
/// use shuttleai::sse::parse_sse_line;
///
/// assert_eq!(parse_sse_line(b"data: {\"key\": 1}"), Some(&b"{\"key\": 1}"[..]));
/// assert_eq!(parse_sse_line(b": keep-alive"), None);
/// ```
pub fn parse_sse_line(line: &[u8]) -> Option<&[u8]> {
    line.strip_prefix(DATA_PREFIX).map(|data| data.trim_ascii())
}

/// Check if an SSE data payload indicates the stream is done.
pub fn is_done_marker(data: &[u8]) -> bool {
    data == b"[DONE]"
}

/// Turn one raw line into at most one event.
///
/// Lines without the `data: ` prefix yield `None`. The `[DONE]` sentinel
/// yields [`SseEvent::Done`]. Anything else after the prefix must be JSON for
/// `T`; otherwise the line is a [`ClientError::Decode`].
pub fn process_line<T: DeserializeOwned>(line: &[u8]) -> Result<Option<SseEvent<T>>, ClientError> {
    let Some(data) = parse_sse_line(line.trim_ascii_end()) else {
        return Ok(None);
    };
    if is_done_marker(data) {
        return Ok(Some(SseEvent::Done));
    }
    Ok(Some(SseEvent::Data(serde_json::from_slice(data)?)))
}

struct SseState<S> {
    bytes: S,
    buffer: Vec<u8>,
    input_ended: bool,
    finished: bool,
}

impl<S> SseState<S> {
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buffer.iter().position(|b| *b == b'\n')?;
        Some(self.buffer.drain(..=pos).collect())
    }
}

/// Decode a byte stream into typed events, ending at `[DONE]`, at the end of
/// input, or after the first error.
pub fn sse_stream<S, T>(bytes: S) -> impl Stream<Item = Result<T, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + Unpin,
    T: DeserializeOwned + Send,
{
    let state = SseState {
        bytes,
        buffer: Vec::new(),
        input_ended: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            let line = match state.take_line() {
                Some(line) => Some(line),
                None if state.input_ended && !state.buffer.is_empty() => {
                    Some(std::mem::take(&mut state.buffer))
                }
                None if state.input_ended => return None,
                None => None,
            };

            if let Some(line) = line {
                match process_line::<T>(&line) {
                    Ok(None) => continue,
                    Ok(Some(SseEvent::Done)) => return None,
                    Ok(Some(SseEvent::Data(item))) => return Some((Ok(item), state)),
                    Err(err) => {
                        state.finished = true;
                        return Some((Err(err), state));
                    }
                }
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(&chunk),
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(ClientError::from(err)), state));
                }
                None => state.input_ended = true,
            }
        }
    })
}

/// Extension trait for `reqwest::Response` to enable SSE streaming.
pub trait SseResponseExt {
    /// Convert the response into a stream of JSON events of type `T`.
    fn sse_events<T>(self) -> impl Stream<Item = Result<T, ClientError>> + Send
    where
        T: DeserializeOwned + Send;
}

impl SseResponseExt for reqwest::Response {
    fn sse_events<T>(self) -> impl Stream<Item = Result<T, ClientError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        sse_stream(Box::pin(self.bytes_stream()))
    }
}

/// Blocking iterator of typed SSE events over any buffered reader.
pub struct SseIter<R, T> {
    reader: R,
    finished: bool,
    _event: PhantomData<fn() -> T>,
}

impl<R: BufRead, T: DeserializeOwned> SseIter<R, T> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
            _event: PhantomData,
        }
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for SseIter<R, T> {
    type Item = Result<T, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        while !self.finished {
            line.clear();
            match self.reader.read_until(b'\n', &mut line) {
                Ok(0) => self.finished = true,
                Ok(_) => match process_line::<T>(&line) {
                    Ok(None) => continue,
                    Ok(Some(SseEvent::Done)) => self.finished = true,
                    Ok(Some(SseEvent::Data(item))) => return Some(Ok(item)),
                    Err(err) => {
                        self.finished = true;
                        return Some(Err(err));
                    }
                },
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(parse_sse_line(b"data: hello"), Some(&b"hello"[..]));
        assert_eq!(parse_sse_line(b"data:   spaces  "), Some(&b"spaces"[..]));
        assert_eq!(parse_sse_line(b"invalid"), None);
        assert_eq!(parse_sse_line(b""), None);
    }

    #[test]
    fn test_is_done_marker() {
        assert!(is_done_marker(b"[DONE]"));
        assert!(!is_done_marker(b""));
        assert!(!is_done_marker(b"{\"key\": \"value\"}"));
    }

    #[test]
    fn test_process_line_cases() {
        assert_eq!(
            process_line::<Value>(b"data: [DONE]").unwrap(),
            Some(SseEvent::Done)
        );
        assert_eq!(
            process_line::<Value>(b"data: {\"a\":1}").unwrap(),
            Some(SseEvent::Data(json!({"a": 1})))
        );
        assert_eq!(process_line::<Value>(b": comment").unwrap(), None);
        assert!(matches!(
            process_line::<Value>(b"data: not-json"),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn test_process_line_is_idempotent() {
        let line = b"data: {\"a\":1}\r\n";
        let first = process_line::<Value>(line).unwrap();
        let second = process_line::<Value>(line).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_sse_stream_reassembles_split_chunks() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b": ping\n\ndata: {\"n\"")),
            Ok(Bytes::from_static(b":1}\n\ndata: {\"n\":2}\n\n")),
            Ok(Bytes::from_static(b"data: [DONE]\n\ndata: {\"n\":3}\n")),
        ];
        let events: Vec<Value> = sse_stream(stream::iter(chunks))
            .map(|event| event.unwrap())
            .collect()
            .await;
        assert_eq!(events, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[tokio::test]
    async fn test_sse_stream_flushes_final_line_without_newline() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> =
            vec![Ok(Bytes::from_static(b"data: {\"n\":1}"))];
        let events: Vec<Result<Value, ClientError>> =
            sse_stream(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_sse_stream_stops_after_malformed_line() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![Ok(Bytes::from_static(
            b"data: {\"n\":1}\ndata: oops\ndata: {\"n\":2}\n",
        ))];
        let events: Vec<Result<Value, ClientError>> =
            sse_stream(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        assert!(events[0].is_ok());
        assert!(matches!(events[1], Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_blocking_iter() {
        let body = "data: {\"n\":1}\r\n\r\nevent: x\ndata: {\"n\":2}\ndata: [DONE]\n";
        let events: Vec<Value> = SseIter::new(body.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events, vec![json!({"n": 1}), json!({"n": 2})]);
    }
}
