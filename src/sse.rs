//! Server-Sent Events (SSE) line framing.
//!
//! The chat completions stream uses a reduced form of SSE where only `data:`
//! lines matter:
//! ```text
//! data: {"key": "value"}
//!
//! : keep-alive
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```
//!
//! [`FrameReader`] pulls bytes from the response body, splits them on `\n`,
//! and hands back the payload of each `data: ` line. Everything else is
//! dropped silently.

use std::io;

use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};

use crate::client::ClientError;

/// Prefix that marks a data-bearing line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks a clean end of stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Reads `data:` payloads from a byte stream.
///
/// The reader owns the byte stream; dropping the reader releases it.
pub struct FrameReader<S> {
    inner: S,
    buffer: BytesMut,
    exhausted: bool,
}

impl<S> FrameReader<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: BytesMut::new(),
            exhausted: false,
        }
    }

    /// Read up to the next data line and return its payload.
    ///
    /// Returns `Ok(None)` once the byte stream is exhausted and no data line
    /// remains. I/O errors from the underlying stream are returned as-is,
    /// without retry.
    pub async fn next_payload(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            while let Some(line) = self.take_line() {
                if let Some(data) = parse_sse_line(&line) {
                    return Ok(Some(data.to_string()));
                }
                tracing::trace!(line = %line, "skipping non-data line");
            }

            if self.exhausted {
                return Ok(None);
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(ClientError::Io(e)),
                None => self.exhausted = true,
            }
        }
    }

    /// Pop one trimmed line off the buffer.
    ///
    /// A trailing line without a terminator is only returned once the stream
    /// is exhausted. Bytes are kept until a full line is available so that
    /// multi-byte characters split across chunks survive.
    fn take_line(&mut self) -> Option<String> {
        let raw = match self.buffer.iter().position(|&b| b == b'\n') {
            Some(pos) => self.buffer.split_to(pos + 1),
            None if self.exhausted && !self.buffer.is_empty() => self.buffer.split(),
            None => return None,
        };
        Some(String::from_utf8_lossy(&raw).trim().to_string())
    }
}

/// Parse an SSE line to extract the data portion.
///
/// SSE lines are in the format: `data: <content>`. The caller trims the
/// line; the content after the prefix is returned untouched.
///
/// # Example
/// ```
/// use mimo::sse::parse_sse_line;
///
/// let line = "data: {\"key\": \"value\"}";
/// assert_eq!(parse_sse_line(line), Some("{\"key\": \"value\"}"));
///
/// let line = "invalid";
/// assert_eq!(parse_sse_line(line), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

/// Check if an SSE data payload indicates the stream is done.
///
/// # Example
/// ```
/// use mimo::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker(""));
/// assert!(!is_done_marker("{\"data\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == DONE_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn reader_from(chunks: Vec<&'static str>) -> FrameReader<impl Stream<Item = io::Result<Bytes>> + Unpin> {
        FrameReader::new(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, io::Error>(Bytes::from_static(c.as_bytes())))
                .collect::<Vec<_>>(),
        ))
    }

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(parse_sse_line("data: hello"), Some("hello"));
        assert_eq!(
            parse_sse_line("data: {\"key\": \"value\"}"),
            Some("{\"key\": \"value\"}")
        );
        assert_eq!(parse_sse_line("data:   spaces"), Some("  spaces"));
        assert_eq!(parse_sse_line("data:  [DONE]"), Some(" [DONE]"));
        assert_eq!(parse_sse_line("data:no-space"), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("invalid"), None);
        assert_eq!(parse_sse_line(""), None);
    }

    #[test]
    fn test_is_done_marker() {
        assert!(is_done_marker("[DONE]"));
        assert!(!is_done_marker(""));
        assert!(!is_done_marker("data"));
        assert!(!is_done_marker("[DONE] "));
        assert!(!is_done_marker("{\"key\": \"value\"}"));
    }

    #[tokio::test]
    async fn test_skips_ignorable_lines() {
        let mut reader = reader_from(vec![
            ": keep-alive\n\nevent: message\ndata: one\n",
            "\r\nid: 7\ndata: two\r\n",
        ]);
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("two"));
        assert_eq!(reader.next_payload().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let mut reader = reader_from(vec!["da", "ta: {\"a\"", ":1}\n"]);
        assert_eq!(
            reader.next_payload().await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(reader.next_payload().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        let text = "data: 你好\n".as_bytes();
        let (head, tail) = text.split_at(8);
        let mut reader = FrameReader::new(stream::iter(vec![
            Ok::<_, io::Error>(Bytes::copy_from_slice(head)),
            Ok(Bytes::copy_from_slice(tail)),
        ]));
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("你好"));
    }

    #[tokio::test]
    async fn test_unterminated_final_line() {
        let mut reader = reader_from(vec!["data: one\ndata: [DONE]"]);
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("[DONE]"));
        assert_eq!(reader.next_payload().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_payload_keeps_inner_whitespace() {
        let mut reader = reader_from(vec!["data:  [DONE]  \r\n", "data: [DONE]\n"]);
        let padded = reader.next_payload().await.unwrap().unwrap();
        assert_eq!(padded, " [DONE]");
        assert!(!is_done_marker(&padded));
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("[DONE]"));
    }

    #[tokio::test]
    async fn test_only_ignorable_lines_is_end_of_input() {
        let mut reader = reader_from(vec![": ping\n\n", ": ping\n"]);
        assert_eq!(reader.next_payload().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_io_error_surfaces() {
        let mut reader = FrameReader::new(stream::iter(vec![
            Ok(Bytes::from_static(b"data: one\n")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
        ]));
        assert_eq!(reader.next_payload().await.unwrap().as_deref(), Some("one"));
        match reader.next_payload().await {
            Err(ClientError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
