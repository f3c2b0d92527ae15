//! SMTP Mailer
//!
//! SMTP over implicit TLS (port 465 by default). `open` connects and
//! authenticates one connection; `close` sends QUIT on it. Nothing is pooled,
//! so every email gets a connection of its own.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Message,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{AsyncSmtpConnection, TlsParameters},
        extension::ClientId,
    },
};

use super::{MailSession, Mailer, OutgoingEmail};
use crate::config::SmtpSettings;
use crate::error::{Result, ToolsError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SmtpMailer {
    settings: SmtpSettings,
    sender: Mailbox,
    credentials: Credentials,
}

impl SmtpMailer {
    /// Fails when the sender address does not parse
    pub fn new(
        settings: SmtpSettings,
        sender_email: &str,
        password: impl Into<String>,
    ) -> Result<Self> {
        let sender = parse_mailbox(sender_email)?;
        Ok(Self {
            settings,
            credentials: Credentials::new(sender_email.to_string(), password.into()),
            sender,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn open(&self) -> Result<Box<dyn MailSession>> {
        let tls = TlsParameters::new(self.settings.host.clone()).map_err(mail_error)?;

        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (self.settings.host.as_str(), self.settings.port),
            Some(CONNECT_TIMEOUT),
            &ClientId::default(),
            Some(tls),
            None,
        )
        .await
        .map_err(mail_error)?;

        if let Err(e) = connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &self.credentials)
            .await
        {
            let _ = connection.quit().await;
            return Err(mail_error(e));
        }

        tracing::debug!(host = %self.settings.host, port = self.settings.port, "SMTP session opened");

        Ok(Box::new(SmtpSession {
            connection: Some(connection),
            sender: self.sender.clone(),
        }))
    }
}

struct SmtpSession {
    connection: Option<AsyncSmtpConnection>,
    sender: Mailbox,
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn send(&mut self, email: &OutgoingEmail) -> Result<()> {
        let message = build_message(&self.sender, email)?;

        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| ToolsError::Mail("session already closed".into()))?;

        connection
            .send(message.envelope(), &message.formatted())
            .await
            .map_err(mail_error)?;

        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.quit().await {
                tracing::debug!(error = %e, "SMTP QUIT failed");
            }
            tracing::debug!("SMTP session closed");
        }
    }
}

/// Plain-text message from `sender`; fails on a bad recipient address
fn build_message(sender: &Mailbox, email: &OutgoingEmail) -> Result<Message> {
    Message::builder()
        .from(sender.clone())
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| ToolsError::Mail(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.trim().parse().map_err(|e: lettre::address::AddressError| ToolsError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn mail_error(err: lettre::transport::smtp::Error) -> ToolsError {
    ToolsError::Mail(err.to_string())
}
