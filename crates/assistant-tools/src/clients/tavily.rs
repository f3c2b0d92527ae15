//! Tavily Search Client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{SearchClient, SearchHit};
use crate::error::{Result, ToolsError};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Results without a content snippet are skipped
    pub(crate) fn parse_hits(body: &Value) -> Result<Vec<SearchHit>> {
        let results = body["results"].as_array().ok_or_else(|| {
            ToolsError::UnexpectedResponse("search response has no results list".into())
        })?;

        Ok(results
            .iter()
            .filter_map(|r| {
                r["content"].as_str().map(|content| SearchHit {
                    content: content.to_string(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let body: Value = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "query": query, "search_depth": "basic" }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ToolsError::http)?
            .json()
            .await
            .map_err(ToolsError::http)?;

        Self::parse_hits(&body)
    }
}
