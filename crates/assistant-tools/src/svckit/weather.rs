//! Weather Lookup Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::clients::WeatherClient;

/// Tool for current weather in a city
pub struct WeatherTool {
    client: Arc<dyn WeatherClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_live_weather".into(),
            description: "Fetches the current weather for a given city.".into(),
            parameters: vec![ParameterSchema::string("city", "City name, e.g. 'Paris'")],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let city = call.str_arg("city").unwrap_or_default();

        match self.client.current(&city).await {
            Ok(report) => Ok(ToolResult::success(
                "get_live_weather",
                format!(
                    "The current weather in {city} is {}°C with {}.",
                    report.temperature_c, report.description
                ),
            )),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "Weather lookup failed");
                Ok(ToolResult::failure(
                    "get_live_weather",
                    format!("Could not fetch weather data. Error: {e}"),
                ))
            }
        }
    }
}
