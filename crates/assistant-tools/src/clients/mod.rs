//! External Service Clients
//!
//! One trait per outside service so tools can be exercised against stubs.
//! The real clients talk to OpenWeather, Tavily and an SMTP server.

mod openweather;
mod smtp;
mod tavily;

pub use openweather::OpenWeatherClient;
pub use smtp::SmtpMailer;
pub use tavily::TavilyClient;

use async_trait::async_trait;

use crate::error::Result;

/// Current conditions for a city
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Condition description, e.g. "clear sky"
    pub description: String,
}

/// Weather provider (Strategy pattern)
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current weather for a city
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

/// One search result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    /// Snippet of the matching page
    pub content: String,
}

/// Web search provider
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Basic-depth search; hits without a snippet are dropped
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// A message to deliver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Source of mail sessions.
///
/// Callers must `close` every session they open, whatever happened in
/// between.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Acquire a session authenticated as the configured sender
    async fn open(&self) -> Result<Box<dyn MailSession>>;
}

/// An open mail session
#[async_trait]
pub trait MailSession: Send {
    /// Deliver one message
    async fn send(&mut self, email: &OutgoingEmail) -> Result<()>;

    /// Release the session. Calling it twice is harmless.
    async fn close(&mut self);
}
