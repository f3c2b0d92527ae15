//! Reply Loop
//!
//! Turns one user message into one final answer. The model either answers
//! or asks for tools; requested tools run one after another, their results
//! are appended to the working context and the model is asked again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Decision, GenerationOptions, LlmProvider};
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System instruction sent with every dispatch
    pub system_prompt: String,

    /// Maximum model dispatches per reply before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when they help answer the question. Be concise and accurate.";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Produce the assistant reply to `user_text`.
    ///
    /// `history` holds earlier completed exchanges as model messages. It is
    /// read, never extended; the caller decides what to keep.
    pub async fn run(&self, history: &[Message], user_text: &str) -> Result<String> {
        let mut context = Vec::with_capacity(history.len() + 2);
        context.push(Message::system(self.config.system_prompt.clone()));
        context.extend_from_slice(history);
        context.push(Message::user(user_text));

        self.run_messages(context).await
    }

    async fn run_messages(&self, mut context: Vec<Message>) -> Result<String> {
        let schemas = self.tools.schemas();

        for iteration in 1..=self.config.max_iterations {
            debug!(iteration, max = self.config.max_iterations, "Dispatching to model");

            let completion = self
                .provider
                .complete(&context, &schemas, &self.config.generation)
                .await?;

            match completion.decision()? {
                Decision::Answer(text) => {
                    info!(iterations = iteration, chars = text.len(), "Reply complete");
                    return Ok(text);
                }
                Decision::ToolCalls(calls) => {
                    let calls = Self::assign_ids(calls);
                    context.push(Message::assistant_with_tools(
                        completion.content.clone(),
                        calls.clone(),
                    ));

                    for call in &calls {
                        let result = self.execute_tool(call).await;
                        context.push(Message::tool(
                            result.name.clone(),
                            result.output,
                            result.id,
                        ));
                    }
                }
            }
        }

        warn!(max = self.config.max_iterations, "Model kept requesting tools");
        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Give every call an id so results can be matched back to requests
    fn assign_ids(calls: Vec<ToolCall>) -> Vec<ToolCall> {
        calls
            .into_iter()
            .map(|call| match call.id {
                Some(_) => call,
                None => call.with_id(uuid::Uuid::new_v4().to_string()),
            })
            .collect()
    }

    /// Execute a tool call; registry errors become text for the model
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.name, "Executing tool");

        let mut result = match self.tools.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call rejected");
                ToolResult::failure(call.name.clone(), format!("Error: {e}"))
            }
        };

        result.id.clone_from(&call.id);
        debug!(tool = %call.name, success = result.success, chars = result.output.len(), "Tool finished");
        result
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Vec<Arc<dyn Tool>>,
    registry: Option<ToolRegistry>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Vec::new(),
            registry: None,
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Add a tool that is already shared
    pub fn shared_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.registry = Some(tools);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        let mut registry = self.registry.unwrap_or_default();
        for tool in self.tools {
            registry.register_boxed(tool)?;
        }

        Ok(Agent::new(provider, Arc::new(registry), self.config))
    }
}
