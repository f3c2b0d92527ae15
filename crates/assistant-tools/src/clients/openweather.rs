//! OpenWeather Client
//!
//! Current conditions from the OpenWeather `/weather` endpoint, metric units.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{WeatherClient, WeatherReport};
use crate::error::{Result, ToolsError};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
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

    /// Pull temperature and description out of a `/weather` body
    pub(crate) fn parse_report(body: &Value) -> Result<WeatherReport> {
        let temperature_c = body["main"]["temp"].as_f64().ok_or_else(|| {
            ToolsError::UnexpectedResponse("weather response has no main.temp".into())
        })?;
        let description = body["weather"][0]["description"]
            .as_str()
            .ok_or_else(|| {
                ToolsError::UnexpectedResponse("weather response has no description".into())
            })?
            .to_string();

        Ok(WeatherReport {
            temperature_c,
            description,
        })
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));

        let body: Value = self
            .client
            .get(url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ToolsError::http)?
            .json()
            .await
            .map_err(ToolsError::http)?;

        Self::parse_report(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_report() {
        let body = json!({
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 18, "humidity": 40 },
            "name": "Paris"
        });

        let report = OpenWeatherClient::parse_report(&body).unwrap();
        assert!((report.temperature_c - 18.0).abs() < f64::EPSILON);
        assert_eq!(report.description, "clear sky");
    }

    #[test]
    fn test_parse_report_unexpected_shape() {
        let no_temp = json!({ "weather": [{ "description": "rain" }], "main": {} });
        assert!(matches!(
            OpenWeatherClient::parse_report(&no_temp),
            Err(ToolsError::UnexpectedResponse(_))
        ));

        let no_conditions = json!({ "weather": [], "main": { "temp": 3.5 } });
        assert!(matches!(
            OpenWeatherClient::parse_report(&no_conditions),
            Err(ToolsError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = OpenWeatherClient::with_base_url("secret-key", "http://127.0.0.1:1");
        let err = client.current("Paris").await.unwrap_err();

        assert!(matches!(err, ToolsError::Http(_)));
        assert!(!err.to_string().contains("secret-key"));
    }
}
