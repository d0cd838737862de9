//! Streaming chat completion with thinking mode.
//!
//! Run with:
//! ```bash
//! export MIMO_API_KEY="your-api-key"
//! RUST_LOG=mimo=debug cargo run --example chat_streaming
//! ```

use std::io::Write;

use mimo::client::StreamingClient;
use mimo::model::{ChatCompletionMessage, ChatCompletionRequest, ThinkingConfig};
use mimo::options::ClientConfig;
use mimo::providers::MimoClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = MimoClient::new(ClientConfig::from_env()?)?;

    let request = ChatCompletionRequest::new(
        "mimo-v2-flash",
        vec![ChatCompletionMessage::user("Write a haiku about Rust programming.")],
    )
    .with_thinking(ThinkingConfig::enabled())
    .with_stream_usage();

    println!("Streaming response from MiMo...\n");

    let mut stream = client.create_chat_completion_stream(request).await?;

    loop {
        // Ctrl-C cancels the read; the session still has to be released.
        let next = tokio::select! {
            next = stream.recv() => next,
            _ = tokio::signal::ctrl_c() => {
                stream.close();
                println!("\n[cancelled]");
                return Ok(());
            }
        };

        match next {
            Ok(Some(fragment)) => {
                if let Some(choice) = fragment.choice(0) {
                    if let Some(reasoning) = &choice.delta.reasoning_content {
                        print!("\x1b[2m{}\x1b[0m", reasoning);
                    }
                    if let Some(content) = &choice.delta.content {
                        print!("{}", content);
                    }
                }
                if let Some(usage) = fragment.usage {
                    println!("\n\n=== Usage Information ===");
                    println!("Prompt tokens: {}", usage.prompt_tokens);
                    println!("Completion tokens: {}", usage.completion_tokens);
                }
                std::io::stdout().flush()?;
            }
            Ok(None) => {
                println!("\n\n=== Stream Complete ===");
                break;
            }
            Err(e) => {
                eprintln!("\nStream error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
