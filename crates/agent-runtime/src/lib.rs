//! # agent-runtime
//!
//! Runtime providers for the assistant.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Gemini `generateContent` API with native
//!   function calling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::gemini::{GeminiConfig, GeminiProvider};
//!
//! let provider = GeminiProvider::from_config(GeminiConfig::from_env()?);
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, ChatSession, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
