//! Single-shot chat completion.
//!
//! Run with:
//! ```bash
//! export MIMO_API_KEY="your-api-key"
//! cargo run --example chat_simple
//! ```

use mimo::client::Client;
use mimo::model::{ChatCompletionMessage, ChatCompletionRequest};
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
        vec![
            ChatCompletionMessage::system("Answer in one word."),
            ChatCompletionMessage::user("What is the capital of France?"),
        ],
    )
    .with_max_tokens(100)
    .with_temperature(0.7);

    println!("Sending request to MiMo...");

    match client.create_chat_completion(request).await {
        Ok(response) => {
            println!("\n=== Response ===");
            println!("{}", response.content());

            if let Some(usage) = &response.usage {
                println!("Prompt tokens: {}", usage.prompt_tokens);
                println!("Completion tokens: {}", usage.completion_tokens);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(status) = e.status_code() {
                eprintln!("Status code: {}", status);
            }
        }
    }

    Ok(())
}
