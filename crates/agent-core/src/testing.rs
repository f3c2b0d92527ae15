//! Scripted provider for exercising the reply loop without a live model.
//!
//! Enabled inside this crate's tests and, for other crates, through the
//! `test-util` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider, ModelInfo};
use crate::tool::{ToolCall, ToolSchema};

type Step = Box<dyn Fn(&[Message]) -> Result<Completion> + Send + Sync>;

/// Replays a fixed sequence of model decisions, one per dispatch.
#[derive(Default)]
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next dispatch answers with fixed text
    pub fn then_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.then(move |_| Ok(Completion::text(text.clone())))
    }

    /// Next dispatch requests these tools
    pub fn then_tools(self, calls: Vec<ToolCall>) -> Self {
        self.then(move |_| Ok(Completion::tools(calls.clone())))
    }

    /// Next dispatch is computed from the messages it receives
    pub fn then<F>(self, step: F) -> Self
    where
        F: Fn(&[Message]) -> Result<Completion> + Send + Sync + 'static,
    {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(Box::new(step));
        }
        self
    }

    /// Every message list this provider has been dispatched with
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolSchema],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let step = self
            .steps
            .lock()
            .map_err(|_| AgentError::Other("script lock poisoned".into()))?
            .pop_front()
            .ok_or_else(|| AgentError::Provider("No more scripted responses".into()))?;

        step(messages)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
            context_length: None,
        }])
    }
}
