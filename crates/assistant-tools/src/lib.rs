//! # assistant-tools
//!
//! The four tools the assistant can call, plus the clients behind them.
//!
//! | Tool | Backend |
//! |------|---------|
//! | `perform_web_search` | Tavily search API |
//! | `get_live_weather` | OpenWeather current conditions |
//! | `send_email` | SMTP over implicit TLS |
//! | `get_link` | static table |
//!
//! Every tool reports outside failures as text so the model can explain
//! them to the user.

pub mod clients;
pub mod config;
pub mod error;
mod svckit;

use std::sync::Arc;

use agent_core::Tool;

pub use config::{Credentials, SmtpSettings};
pub use error::{Result, ToolsError};

/// Tool implementations
pub mod tools {
    pub use crate::svckit::{LinkLookupTool, SendEmailTool, WeatherTool, WebSearchTool, lookup_link};
}

/// System instruction for the assistant
pub const ASSISTANT_PROMPT: &str = "You are a helpful and powerful AI assistant. Your goal is to provide accurate, up-to-date answers. \n\
For any question about current events, real-time information, or to find links not in your knowledge base, you MUST use your web search tool.\n\
If a user asks for a link to a specific application, you should use the 'get_link' tool first.";

/// Build the standard tool set from startup credentials.
///
/// Order is web search, weather, email, link lookup.
pub fn default_tools(credentials: &Credentials, smtp: &SmtpSettings) -> Result<Vec<Arc<dyn Tool>>> {
    let search = clients::TavilyClient::new(credentials.tavily_api_key.clone());
    let weather = clients::OpenWeatherClient::new(credentials.openweather_api_key.clone());
    let mailer = clients::SmtpMailer::new(
        smtp.clone(),
        &credentials.sender_email,
        credentials.email_password.clone(),
    )?;

    Ok(vec![
        Arc::new(tools::WebSearchTool::new(Arc::new(search))),
        Arc::new(tools::WeatherTool::new(Arc::new(weather))),
        Arc::new(tools::SendEmailTool::new(Arc::new(mailer))),
        Arc::new(tools::LinkLookupTool),
    ])
}
