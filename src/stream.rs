//! Streaming chat completion sessions.
//!
//! A [`ChatCompletionStream`] owns the response body of a streaming request and
//! turns it into [`ChatCompletionStreamResponse`] fragments, one per `data:`
//! event. The stream ends cleanly only when the server sends `data: [DONE]`;
//! a body that ends without it is reported as
//! [`ClientError::UnexpectedTermination`].

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream};

use crate::aggregate::StreamAccumulator;
use crate::client::ClientError;
use crate::model::{ChatCompletionResponse, ChatCompletionStreamResponse};
use crate::sse::{is_done_marker, FrameReader};

/// Byte channel a session reads from.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Result of decoding one `data:` payload.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Chunk(ChatCompletionStreamResponse),
    /// The `[DONE]` sentinel.
    Done,
}

/// Decode the payload of a `data:` line.
///
/// The sentinel is matched before any JSON parsing. Unknown fields are
/// ignored and missing ones take their defaults.
pub fn decode_event(payload: &str) -> Result<StreamEvent, ClientError> {
    if is_done_marker(payload) {
        return Ok(StreamEvent::Done);
    }

    serde_json::from_str(payload)
        .map(StreamEvent::Chunk)
        .map_err(|source| ClientError::Decode {
            payload: payload.to_string(),
            source,
        })
}

/// Lifecycle state of a [`ChatCompletionStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Open,
    Closed,
}

/// A live streaming response.
///
/// Call [`recv`](Self::recv) until it returns `Ok(None)` or an error. Every
/// error is fatal: the session is already closed when the error is returned.
///
/// `recv` must not be called concurrently; it takes `&mut self`. To cancel,
/// race `recv` against your own signal (e.g. `tokio::select!`) and then call
/// [`close`](Self::close) or drop the session.
pub struct ChatCompletionStream {
    reader: Option<FrameReader<ByteStream>>,
}

impl ChatCompletionStream {
    /// Open a session over a byte stream.
    pub fn new<S>(body: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        tracing::debug!("chat completion stream opened");
        let body: ByteStream = Box::pin(body);
        Self {
            reader: Some(FrameReader::new(body)),
        }
    }

    /// Open a session over a successful HTTP response.
    pub fn from_response(response: reqwest::Response) -> Self {
        use futures::TryStreamExt;

        Self::new(response.bytes_stream().map_err(io::Error::other))
    }

    pub fn state(&self) -> StreamState {
        if self.reader.is_some() {
            StreamState::Open
        } else {
            StreamState::Closed
        }
    }

    /// Wait for the next fragment.
    ///
    /// - `Ok(Some(fragment))`: a decoded event; the session stays open.
    /// - `Ok(None)`: the server sent `[DONE]`; the session is closed.
    /// - `Err(_)`: I/O failure, undecodable payload, or end of body without
    ///   `[DONE]`; the session is closed.
    ///
    /// Returns [`ClientError::StreamClosed`] once the session is closed.
    pub async fn recv(&mut self) -> Result<Option<ChatCompletionStreamResponse>, ClientError> {
        let reader = self.reader.as_mut().ok_or(ClientError::StreamClosed)?;

        let outcome = match reader.next_payload().await {
            Ok(Some(payload)) => decode_event(&payload),
            Ok(None) => Err(ClientError::UnexpectedTermination),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(StreamEvent::Chunk(fragment)) => Ok(Some(fragment)),
            Ok(StreamEvent::Done) => {
                self.close();
                Ok(None)
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    /// Release the response body. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!("chat completion stream closed");
        }
    }

    /// Read the session to completion and merge all fragments.
    pub async fn collect(mut self) -> Result<ChatCompletionResponse, ClientError> {
        let mut accumulator = StreamAccumulator::new();
        while let Some(fragment) = self.recv().await? {
            accumulator.push(&fragment);
        }
        Ok(accumulator.finish())
    }

    /// Adapt the session into a [`Stream`].
    ///
    /// The stream ends after `[DONE]`, or right after yielding the first error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<ChatCompletionStreamResponse, ClientError>> + Send {
        stream::unfold(Some(self), |session| async move {
            let Some(mut session) = session else {
                return None;
            };
            match session.recv().await {
                Ok(Some(fragment)) => Some((Ok(fragment), Some(session))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl std::fmt::Debug for ChatCompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionStream")
            .field("state", &self.state())
            .finish()
    }
}
