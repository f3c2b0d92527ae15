//! Error Types for the assistant tools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolsError>;

#[derive(Error, Debug)]
pub enum ToolsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Configuration error: {0}")]
    Config(String),

}

impl ToolsError {
    /// HTTP error with the request URL stripped, since URLs may carry keys
    pub fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
