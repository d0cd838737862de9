//! # mimo - MiMo chat completions client
//!
//! An async Rust client for the MiMo chat completions API, covering both the
//! single-shot endpoint and its server-sent-events streaming variant.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Streaming sessions that tell a clean `[DONE]` apart from a dropped connection
//! - Thinking mode (`reasoning_content`) and tool calls
//! - Explicit, immutable client configuration
//!
//! ## Architecture
//!
//! - **`ClientConfig`**: endpoint, API key and transport settings
//! - **`MimoClient`**: implements [`Client`] and [`StreamingClient`]
//! - **`ChatCompletionStream`**: pull-based streaming session; call `recv`
//!   until it yields `None`
//! - **`StreamAccumulator`**: folds stream fragments into a full response
//!
//! ## Example
//! ```no_run
//! use mimo::client::StreamingClient;
//! use mimo::model::{ChatCompletionMessage, ChatCompletionRequest};
//! use mimo::options::ClientConfig;
//! use mimo::providers::MimoClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MimoClient::new(ClientConfig::new("your-api-key"))?;
//!
//!     let request = ChatCompletionRequest::new(
//!         "mimo-v2-flash",
//!         vec![ChatCompletionMessage::user("Hello!")],
//!     );
//!
//!     let mut stream = client.create_chat_completion_stream(request).await?;
//!     while let Some(fragment) = stream.recv().await? {
//!         print!("{}", fragment.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod providers;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use aggregate::StreamAccumulator;
pub use client::{Client, ClientError, StreamingClient};
pub use model::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse, ChatCompletionStreamResponse};
pub use options::ClientConfig;
pub use providers::MimoClient;
pub use stream::{ChatCompletionStream, StreamState};
