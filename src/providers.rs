//! LLM provider implementations.

pub mod mimo;

// Re-export for convenience
pub use mimo::MimoClient;
