//! # agent-core
//!
//! Provider-agnostic LLM completion abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌─────────────────────┐     ┌──────────────┐
//! │  Caller (prompt +    │────▶│    LlmProvider      │────▶│  Groq, ...   │
//! │  GenerationOptions)  │     │    (Strategy)       │     │  backend     │
//! └──────────────────────┘     └─────────────────────┘     └──────────────┘
//! ```
//!
//! The `LlmProvider` trait lets callers swap between Groq, OpenAI, Ollama
//! or any other backend without changing the code that builds prompts.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
