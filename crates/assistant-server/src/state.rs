//! Application State

use std::sync::Arc;

use agent_core::{Agent, LlmProvider, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Model backend, kept for health checks
    pub provider: Arc<dyn LlmProvider>,

    /// Reply loop with the registered tools
    pub agent: Arc<Agent>,

    /// Live conversations
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            provider: Arc::clone(agent.provider()),
            sessions: Arc::new(SessionStore::new(Arc::clone(&agent))),
            agent,
        }
    }
}
