//! # agent-core
//!
//! Core of the assistant: a model-agnostic reply loop that lets an LLM call
//! registered tools before it answers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ChatSession                             │
//! │   Transcript (user/assistant turns)                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Reply Loop  │  │    Tools    │  │   LlmProvider       │  │
//! │  │  (Agent)    │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping the model backend without
//! changing agent logic.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod error;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{AgentError, Result};
pub use message::{Message, Role, Speaker, Transcript, Turn};
pub use provider::{Completion, DEFAULT_MODEL, Decision, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use session::{ChatSession, SessionId, SessionStore, SharedSession, DEFAULT_GREETING};
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
