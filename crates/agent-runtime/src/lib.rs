//! # agent-runtime
//!
//! Runtime providers for the crypto signal bot.
//!
//! - **Groq** (default): hosted inference through Groq's OpenAI-compatible API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::groq::{GroqConfig, GroqProvider};
//!
//! let provider = GroqProvider::new(reqwest::Client::new(), GroqConfig::new(api_key));
//! let completion = provider.prompt("Hello", &options).await?;
//! ```

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "groq")]
pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};
