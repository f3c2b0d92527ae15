//! Web Search Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::clients::SearchClient;

/// Tool for real-time information from the web
pub struct WebSearchTool {
    client: Arc<dyn SearchClient>,
}

impl WebSearchTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "perform_web_search".into(),
            description: "Use this tool to get real-time information from the internet, \
                or to find links not in the knowledge base. It is ideal for current events, \
                recent discoveries, or any up-to-the-minute information."
                .into(),
            parameters: vec![ParameterSchema::string("query", "Search query")],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();

        match self.client.search(&query).await {
            Ok(hits) if hits.is_empty() => Ok(ToolResult::success(
                "perform_web_search",
                format!("No results found for '{query}'."),
            )),
            Ok(hits) => {
                let output = hits
                    .iter()
                    .map(|h| format!("- {}", h.content))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ToolResult::success("perform_web_search", output))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Web search failed");
                Ok(ToolResult::failure(
                    "perform_web_search",
                    format!("Could not perform web search. Error: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{SearchHit, TavilyClient};
    use crate::error::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSearch {
        hits: Vec<SearchHit>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchClient for RecordingSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
            self.seen.lock().unwrap().push(query.to_string());
            Ok(self.hits.clone())
        }
    }

    fn hit(content: &str) -> SearchHit {
        SearchHit {
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_bulleted_snippets() {
        let search = Arc::new(RecordingSearch {
            hits: vec![hit("First snippet."), hit("Second snippet.")],
            ..Default::default()
        });
        let tool = WebSearchTool::new(search.clone());

        let result = tool
            .execute(&ToolCall::new("perform_web_search").arg("query", "latest rust release"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, "- First snippet.\n- Second snippet.");
        assert_eq!(
            search.seen.lock().unwrap().as_slice(),
            &["latest rust release".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_results() {
        let tool = WebSearchTool::new(Arc::new(RecordingSearch::default()));
        let result = tool
            .execute(&ToolCall::new("perform_web_search").arg("query", "zzqx"))
            .await
            .unwrap();

        assert_eq!(result.output, "No results found for 'zzqx'.");
    }

    #[tokio::test]
    async fn test_transport_fault_is_text() {
        let tool = WebSearchTool::new(Arc::new(TavilyClient::with_base_url(
            "key",
            "http://127.0.0.1:1",
        )));
        let result = tool
            .execute(&ToolCall::new("perform_web_search").arg("query", "news"))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.starts_with("Could not perform web search. Error:"));
    }
}
