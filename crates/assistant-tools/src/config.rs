//! Credentials and connection settings
//!
//! Built once at process start and handed to the tools; nothing here reads
//! the environment after that.

use crate::error::{Result, ToolsError};

/// Environment variables that must be present before the assistant can run
pub const REQUIRED_VARS: [&str; 5] = [
    "GOOGLE_API_KEY",
    "OPENWEATHER_API_KEY",
    "TAVILY_API_KEY",
    "SENDER_EMAIL",
    "EMAIL_PASSWORD",
];

/// The five secrets the assistant needs
#[derive(Clone)]
pub struct Credentials {
    pub google_api_key: String,
    pub openweather_api_key: String,
    pub tavily_api_key: String,
    pub sender_email: String,
    pub email_password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("sender_email", &self.sender_email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Read all credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Every missing or blank
    /// variable is reported, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<Option<String>> = REQUIRED_VARS
            .iter()
            .map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
            .collect();

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ToolsError::Config(format!(
                "missing required credentials: {}",
                missing.join(", ")
            )));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            google_api_key: next(),
            openweather_api_key: next(),
            tavily_api_key: next(),
            sender_email: next(),
            email_password: next(),
        })
    }
}

/// Outgoing mail server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpSettings {
    /// SMTP host; TLS is negotiated immediately on connect
    pub host: String,

    /// Submission port for implicit TLS
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 465,
        }
    }
}

impl SmtpSettings {
    /// `SMTP_HOST` and `SMTP_PORT`, each optional
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("SMTP_HOST").unwrap_or(defaults.host);
        let port = match lookup("SMTP_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ToolsError::Config(format!("SMTP_PORT is not a port number: {p}")))?,
            None => defaults.port,
        };

        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_all_credentials_present() {
        let vars = env(&[
            ("GOOGLE_API_KEY", "g"),
            ("OPENWEATHER_API_KEY", "w"),
            ("TAVILY_API_KEY", "t"),
            ("SENDER_EMAIL", "bot@example.com"),
            ("EMAIL_PASSWORD", "p"),
        ]);

        let creds = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.google_api_key, "g");
        assert_eq!(creds.openweather_api_key, "w");
        assert_eq!(creds.tavily_api_key, "t");
        assert_eq!(creds.sender_email, "bot@example.com");
        assert_eq!(creds.email_password, "p");
    }

    #[test]
    fn test_missing_credentials_reported() {
        let vars = env(&[
            ("GOOGLE_API_KEY", "g"),
            ("TAVILY_API_KEY", "  "),
            ("SENDER_EMAIL", "bot@example.com"),
        ]);

        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("OPENWEATHER_API_KEY"));
        assert!(msg.contains("TAVILY_API_KEY"));
        assert!(msg.contains("EMAIL_PASSWORD"));
        assert!(!msg.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials {
            google_api_key: "secret-g".into(),
            openweather_api_key: "secret-w".into(),
            tavily_api_key: "secret-t".into(),
            sender_email: "bot@example.com".into(),
            email_password: "secret-p".into(),
        };
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn test_smtp_settings() {
        assert_eq!(
            SmtpSettings::from_lookup(|_| None).unwrap(),
            SmtpSettings::default()
        );

        let vars = env(&[("SMTP_HOST", "mail.example.com"), ("SMTP_PORT", "2465")]);
        let smtp = SmtpSettings::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(smtp.host, "mail.example.com");
        assert_eq!(smtp.port, 2465);

        let bad = env(&[("SMTP_PORT", "smtp")]);
        assert!(SmtpSettings::from_lookup(|k| bad.get(k).cloned()).is_err());
    }
}
