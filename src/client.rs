//! Core client traits and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ChatCompletionRequest, ChatCompletionResponse};
use crate::stream::ChatCompletionStream;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the connection failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status outside `[200, 400)`.
    #[error("api error: status_code={status}{}", .detail.as_ref().map(ApiErrorDetail::to_string).unwrap_or_default())]
    Api {
        status: u16,
        /// Parsed error body, when the server sent one we could read.
        detail: Option<ApiErrorDetail>,
    },

    /// Reading the event stream failed mid-session.
    #[error("stream read error: {0}")]
    Io(#[source] std::io::Error),

    /// The event stream ended without the `[DONE]` sentinel.
    #[error("unexpected end of stream")]
    UnexpectedTermination,

    /// A `data:` payload was not a valid stream event.
    #[error("unmarshal error: {source}, data: {payload}")]
    Decode {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("empty response body")]
    EmptyResponse,

    #[error("stream already closed")]
    StreamClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status code, for errors produced by a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Structured error information returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetail {
    pub message: String,
    pub error_type: String,
    pub code: String,
}

impl std::fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            " type={} code={} message={}",
            self.error_type, self.code, self.message
        )
    }
}

/// Non-streaming chat completions.
///
/// Implement this trait to plug a different transport behind the same
/// request and response types.
#[async_trait]
pub trait Client: Send + Sync {
    /// Send one request and wait for the complete response.
    ///
    /// `request.stream` is forced to `false`.
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ClientError>;
}

/// Extension trait for streaming support.
///
/// # Example
/// ```rust,no_run
/// use mimo::client::StreamingClient;
/// use mimo::model::{ChatCompletionMessage, ChatCompletionRequest};
/// use mimo::options::ClientConfig;
/// use mimo::providers::MimoClient;
///
/// # async fn run() -> Result<(), mimo::ClientError> {
/// let client = MimoClient::new(ClientConfig::new("sk-..."))?;
/// let request = ChatCompletionRequest::new("mimo-v2-flash", vec![ChatCompletionMessage::user("Hi")]);
///
/// let mut stream = client.create_chat_completion_stream(request).await?;
/// while let Some(fragment) = stream.recv().await? {
///     print!("{}", fragment.content());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait StreamingClient: Client {
    /// Open a streaming session.
    ///
    /// `request.stream` is forced to `true`. No session is opened when the
    /// server answers with a failure status.
    async fn create_chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_detail() {
        let err = ClientError::Api {
            status: 401,
            detail: Some(ApiErrorDetail {
                message: "invalid key".to_string(),
                error_type: "authentication_error".to_string(),
                code: "invalid_api_key".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "api error: status_code=401 type=authentication_error code=invalid_api_key message=invalid key"
        );
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_api_error_display_status_only() {
        let err = ClientError::Api {
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "api error: status_code=502");
    }

    #[test]
    fn test_decode_error_carries_payload() {
        let source = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err = ClientError::Decode {
            payload: "not-json".to_string(),
            source,
        };
        assert!(err.to_string().contains("not-json"));
        assert_eq!(err.status_code(), None);
    }
}
