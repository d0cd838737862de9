//! MiMo chat completions client.
//!
//! Implements [`Client`] and [`StreamingClient`] against the OpenAI-style
//! `/chat/completions` endpoint, authenticated with the `api-key` header.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::client::{Client, ClientError, StreamingClient};
use crate::http::{build_http_client, default_headers, handle_error_response, is_success};
use crate::model::{ChatCompletionRequest, ChatCompletionResponse};
use crate::options::ClientConfig;
use crate::stream::ChatCompletionStream;

/// MiMo client using HTTP transport.
#[derive(Debug, Clone)]
pub struct MimoClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl MimoClient {
    /// Create a client, building an HTTP client from the config.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = build_http_client(&config)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client that sends requests through the given HTTP client.
    ///
    /// `timeout` and `proxy` from the config are ignored; configure them on
    /// `http` instead.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send the request and return the response once its status is known.
    ///
    /// Failure statuses are turned into [`ClientError::Api`] after reading the
    /// body, which also releases the connection.
    async fn send(
        &self,
        request: &ChatCompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.config.chat_completions_url();
        debug!("Sending chat completion request to {}", url);

        let response = self
            .http
            .post(&url)
            .headers(default_headers(&self.config, stream)?)
            .json(request)
            .send()
            .await?;
        let status = response.status();

        if !is_success(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(handle_error_response(status, &body));
        }

        Ok(response)
    }
}

#[async_trait]
impl Client for MimoClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn create_chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ClientError> {
        request.stream = Some(false);
        request.stream_options = None;

        let response = self.send(&request, false).await?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StreamingClient for MimoClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn create_chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream, ClientError> {
        request.stream = Some(true);

        let response = self.send(&request, true).await?;
        Ok(ChatCompletionStream::from_response(response))
    }
}
