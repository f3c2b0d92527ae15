//! Server settings
//!
//! Optional knobs read from the environment; credentials live in
//! `assistant_tools::Credentials`.

use std::time::Duration;

use agent_core::DEFAULT_MODEL;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{name} must be a positive integer, got {value:?}")]
    NotAPositiveInteger { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    /// Gemini model id
    pub model: String,

    /// Cap on model calls per user message
    pub max_iterations: usize,

    /// Listen address
    pub bind_addr: String,

    /// Sessions untouched this long are dropped
    pub session_idle: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_iterations: 10,
            bind_addr: "0.0.0.0:3000".into(),
            session_idle: Duration::from_secs(3600),
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `GEMINI_MODEL`, `ASSISTANT_MAX_ITERATIONS`, `BIND_ADDR` and
    /// `SESSION_IDLE_SECS`, each optional
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_iterations =
            positive(&lookup, "ASSISTANT_MAX_ITERATIONS")?.unwrap_or(defaults.max_iterations);
        let session_idle = positive(&lookup, "SESSION_IDLE_SECS")?
            .map_or(defaults.session_idle, |secs| Duration::from_secs(secs as u64));

        Ok(Self {
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            max_iterations,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_idle,
        })
    }
}

fn positive<F>(lookup: &F, name: &'static str) -> Result<Option<usize>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(SettingsError::NotAPositiveInteger { name, value }),
    }
}
