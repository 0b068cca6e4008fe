//! LLM Adapter - OpenRouter chat completions

mod openrouter_client;

pub use openrouter_client::{OpenRouterClient, OpenRouterConfig};
