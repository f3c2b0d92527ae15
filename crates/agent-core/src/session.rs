//! Session Management
//!
//! A [`ChatSession`] owns one conversation and binds it to an [`Agent`]. It
//! keeps two histories: the transcript shown to the user, and the model
//! messages of completed exchanges. The greeting and error replies only
//! appear in the first.
//!
//! The [`SessionStore`] keeps sessions in memory; each session sits behind
//! its own async mutex so a conversation only ever has one writer. Ids are
//! minted here, never taken from clients, and idle sessions are evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::message::{Message, Transcript};
use crate::reasoning::Agent;

/// Opening assistant turn of every session
pub const DEFAULT_GREETING: &str = "How can I help you today?";

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A conversation bound to one agent configuration
pub struct ChatSession {
    id: SessionId,
    agent: Arc<Agent>,
    transcript: Transcript,
    history: Vec<Message>,
    greeting: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session whose transcript opens with [`DEFAULT_GREETING`]
    pub fn new(agent: Arc<Agent>) -> Self {
        Self::with_greeting(agent, DEFAULT_GREETING)
    }

    /// Create a session with a custom opening turn
    pub fn with_greeting(agent: Arc<Agent>, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            agent,
            transcript: Transcript::with_greeting(greeting.clone()),
            history: Vec::new(),
            greeting,
            created_at: now,
            updated_at: now,
        }
    }

    /// Send a user message and return the assistant's reply.
    ///
    /// Exactly two turns are appended to the transcript: the user text and
    /// the reply. When the model call fails the reply is the error
    /// description, and the exchange is left out of the model history.
    pub async fn send(&mut self, user_text: &str) -> String {
        self.transcript.push_user(user_text);

        let reply = match self.agent.run(&self.history, user_text).await {
            Ok(text) => {
                self.history.push(Message::user(user_text));
                self.history.push(Message::assistant(text.clone()));
                text
            }
            Err(e) => {
                if e.is_provider_fault() {
                    error!(session = %self.id, error = %e, "Model call failed");
                } else {
                    warn!(session = %self.id, error = %e, "Reply loop failed");
                }
                format!("An error occurred: {e}")
            }
        };

        self.transcript.push_assistant(reply.clone());
        self.touch();
        reply
    }

    /// Start over from the opening greeting
    pub fn reset(&mut self) {
        self.transcript = Transcript::with_greeting(self.greeting.clone());
        self.history.clear();
        self.touch();
        info!(session = %self.id, "Session reset");
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last send or reset
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Turn count
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}

/// Shared handle to a session
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// In-memory session store
pub struct SessionStore {
    agent: Arc<Agent>,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl SessionStore {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh session under a newly minted id
    pub async fn create(&self) -> (SessionId, SharedSession) {
        let session = ChatSession::new(Arc::clone(&self.agent));
        let id = session.id().clone();

        let shared = Arc::clone(
            self.sessions
                .write()
                .await
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(session))),
        );
        info!(session = %id, "Session created");
        (id, shared)
    }

    /// Look up a session
    pub async fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a session
    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "Session removed");
        }
        removed
    }

    /// Drop sessions untouched for at least `max_idle`. Sessions busy with a
    /// send are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.updated_at() > cutoff,
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, Speaker};
    use crate::provider::Completion;
    use crate::reasoning::AgentBuilder;
    use crate::testing::ScriptedProvider;
    use crate::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};
    use crate::{AgentError, Result};
    use async_trait::async_trait;

    struct CountTool;

    #[async_trait]
    impl Tool for CountTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "count".into(),
                description: "Count characters".into(),
                parameters: vec![ParameterSchema::string("text", "Text")],
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call.str_arg("text").unwrap_or_default();
            Ok(ToolResult::success("count", text.chars().count().to_string()))
        }
    }

    fn agent(provider: ScriptedProvider) -> Arc<Agent> {
        Arc::new(
            AgentBuilder::new()
                .provider(Arc::new(provider))
                .tool(CountTool)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_session_starts_with_greeting() {
        let session = ChatSession::new(agent(ScriptedProvider::new()));
        assert_eq!(session.message_count(), 1);

        let first = &session.transcript().turns()[0];
        assert_eq!(first.role(), Speaker::Assistant);
        assert_eq!(first.content(), DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_two_tool_calls_add_two_turns() {
        let provider = ScriptedProvider::new()
            .then_tools(vec![ToolCall::new("count").arg("text", "abc")])
            .then_tools(vec![ToolCall::new("count").arg("text", "abcde")])
            .then(|messages| {
                let counts: Vec<_> = messages
                    .iter()
                    .filter(|m| m.role == Role::Tool)
                    .map(|m| m.content.clone())
                    .collect();
                Ok(Completion::text(format!("Counts: {}", counts.join(", "))))
            });
        let mut session = ChatSession::new(agent(provider));

        let reply = session.send("count abc then abcde").await;

        assert_eq!(reply, "Counts: 3, 5");
        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].role(), Speaker::User);
        assert_eq!(turns[1].content(), "count abc then abcde");
        assert_eq!(turns[2].role(), Speaker::Assistant);
        assert_eq!(turns[2].content(), "Counts: 3, 5");
    }

    #[tokio::test]
    async fn test_model_failure_becomes_reply() {
        let provider = ScriptedProvider::new()
            .then(|_| Err(AgentError::Provider("quota exceeded".into())));
        let mut session = ChatSession::new(agent(provider));

        let reply = session.send("hello").await;

        assert_eq!(reply, "An error occurred: Provider error: quota exceeded");
        assert_eq!(session.message_count(), 3);
        assert_eq!(session.transcript().last().unwrap().content(), reply);
    }

    #[tokio::test]
    async fn test_history_sent_on_each_turn() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then_text("first answer")
                .then_text("second answer"),
        );
        let agent = Arc::new(
            AgentBuilder::new()
                .provider(provider.clone())
                .build()
                .unwrap(),
        );
        let mut session = ChatSession::new(agent);

        session.send("one").await;
        session.send("two").await;

        let requests = provider.requests();
        let first: Vec<_> = requests[0].iter().map(|m| m.content.as_str()).collect();
        let second: Vec<_> = requests[1].iter().skip(1).map(|m| m.content.as_str()).collect();

        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[0][1].role, Role::User);
        assert!(!first.contains(&DEFAULT_GREETING));
        assert_eq!(second, vec!["one", "first answer", "two"]);
    }

    #[tokio::test]
    async fn test_failed_exchange_not_replayed() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .then(|_| Err(AgentError::ProviderUnavailable("timeout".into())))
                .then_text("recovered"),
        );
        let agent = Arc::new(
            AgentBuilder::new()
                .provider(provider.clone())
                .build()
                .unwrap(),
        );
        let mut session = ChatSession::new(agent);

        let failed = session.send("first try").await;
        assert!(failed.starts_with("An error occurred:"));
        session.send("second try").await;

        let requests = provider.requests();
        let second: Vec<_> = requests[1].iter().skip(1).map(|m| m.content.as_str()).collect();
        assert_eq!(second, vec!["second try"]);
        assert_eq!(session.message_count(), 5);
    }

    #[tokio::test]
    async fn test_reset() {
        let mut session = ChatSession::new(agent(ScriptedProvider::new().then_text("hi")));
        session.send("hello").await;
        assert_eq!(session.message_count(), 3);

        session.reset();
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.transcript().turns()[0].content(), DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_reset_forgets_model_history() {
        let provider = Arc::new(ScriptedProvider::new().then_text("hi").then_text("fresh"));
        let agent = Arc::new(
            AgentBuilder::new()
                .provider(provider.clone())
                .build()
                .unwrap(),
        );
        let mut session = ChatSession::new(agent);

        session.send("hello").await;
        session.reset();
        session.send("again").await;

        let requests = provider.requests();
        assert_eq!(requests[1].len(), 2);
        assert_eq!(requests[1][1].content, "again");
    }

    #[tokio::test]
    async fn test_store_mints_ids() {
        let store = SessionStore::new(agent(ScriptedProvider::new()));
        assert!(store.is_empty().await);

        let (a, session) = store.create().await;
        let (b, _) = store.create().await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
        assert_eq!(session.lock().await.id(), &a);

        assert!(store.get(&a).await.is_some());
        assert!(store.get(&SessionId::from_string("web-1")).await.is_none());
        assert_eq!(store.len().await, 2);

        assert!(store.remove(&a).await);
        assert!(!store.remove(&a).await);
        assert!(store.get(&a).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_idle_sessions() {
        let store = SessionStore::new(agent(ScriptedProvider::new()));
        let (idle, _) = store.create().await;
        let (busy, busy_session) = store.create().await;

        assert_eq!(store.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(store.len().await, 2);

        let guard = busy_session.lock().await;
        assert_eq!(store.evict_idle(Duration::ZERO).await, 1);
        drop(guard);

        assert!(store.get(&idle).await.is_none());
        assert!(store.get(&busy).await.is_some());
    }

    #[tokio::test]
    async fn test_timestamps_track_activity() {
        let mut session = ChatSession::new(agent(ScriptedProvider::new().then_text("hi")));
        let created = session.created_at();
        assert_eq!(session.updated_at(), created);

        session.send("hello").await;
        assert!(session.updated_at() >= created);
        assert_eq!(session.created_at(), created);
    }
}
