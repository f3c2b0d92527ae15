//! Send Email Tool
//!
//! The only tool with an effect outside the process. The mail session is
//! released on every path, including failed sends.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::clients::{Mailer, OutgoingEmail};
use crate::error::Result;

pub struct SendEmailTool {
    mailer: Arc<dyn Mailer>,
}

impl SendEmailTool {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    async fn deliver(&self, email: &OutgoingEmail) -> Result<()> {
        let mut session = self.mailer.open().await?;
        let sent = session.send(email).await;
        session.close().await;
        sent
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "send_email".into(),
            description: "Sends an email to a specified recipient.".into(),
            parameters: vec![
                ParameterSchema::string("to_address", "Recipient email address"),
                ParameterSchema::string("subject", "Subject line"),
                ParameterSchema::string("body", "Plain-text message body"),
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let email = OutgoingEmail {
            to: call.str_arg("to_address").unwrap_or_default(),
            subject: call.str_arg("subject").unwrap_or_default(),
            body: call.str_arg("body").unwrap_or_default(),
        };

        match self.deliver(&email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, "Email sent");
                Ok(ToolResult::success(
                    "send_email",
                    format!("Email successfully sent to {}.", email.to),
                ))
            }
            Err(e) => {
                tracing::warn!(to = %email.to, error = %e, "Email delivery failed");
                Ok(ToolResult::failure(
                    "send_email",
                    format!("Failed to send email. Error: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MailSession;
    use crate::error::ToolsError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Outcome {
        Deliver,
        RejectAuth,
        RefuseConnection,
    }

    struct RecordingMailer {
        outcome: Outcome,
        open: Arc<AtomicUsize>,
        opened: AtomicUsize,
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    impl RecordingMailer {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                open: Arc::new(AtomicUsize::new(0)),
                opened: AtomicUsize::new(0),
                sent: Arc::default(),
            }
        }
    }

    struct RecordingSession {
        outcome: Outcome,
        open: Arc<AtomicUsize>,
        closed: bool,
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn open(&self) -> Result<Box<dyn MailSession>> {
            if matches!(self.outcome, Outcome::RefuseConnection) {
                return Err(ToolsError::Mail("connection refused".into()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            self.open.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(RecordingSession {
                outcome: self.outcome,
                open: Arc::clone(&self.open),
                closed: false,
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    #[async_trait]
    impl MailSession for RecordingSession {
        async fn send(&mut self, email: &OutgoingEmail) -> Result<()> {
            match self.outcome {
                Outcome::RejectAuth => Err(ToolsError::Mail(
                    "permanent error (535): Username and Password not accepted".into(),
                )),
                _ => {
                    self.sent.lock().unwrap().push(email.clone());
                    Ok(())
                }
            }
        }

        async fn close(&mut self) {
            if !self.closed {
                self.closed = true;
                self.open.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    fn call() -> ToolCall {
        ToolCall::new("send_email")
            .arg("to_address", "friend@example.com")
            .arg("subject", "Hello")
            .arg("body", "See you at noon.")
    }

    #[tokio::test]
    async fn test_successful_send() {
        let mailer = Arc::new(RecordingMailer::new(Outcome::Deliver));
        let tool = SendEmailTool::new(mailer.clone());

        let result = tool.execute(&call()).await.unwrap();

        assert!(result.success);
        assert_eq!(result.output, "Email successfully sent to friend@example.com.");
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[0].body, "See you at noon.");
        assert_eq!(mailer.open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_rejection_releases_session() {
        let mailer = Arc::new(RecordingMailer::new(Outcome::RejectAuth));
        let tool = SendEmailTool::new(mailer.clone());

        let result = tool.execute(&call()).await.unwrap();

        assert!(!result.success);
        assert!(result.output.starts_with("Failed to send email. Error:"));
        assert!(result.output.contains("535"));
        assert_eq!(mailer.opened.load(Ordering::SeqCst), 1);
        assert_eq!(mailer.open.load(Ordering::SeqCst), 0);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let mailer = Arc::new(RecordingMailer::new(Outcome::RefuseConnection));
        let tool = SendEmailTool::new(mailer.clone());

        let result = tool.execute(&call()).await.unwrap();

        assert!(!result.success);
        assert_eq!(
            result.output,
            "Failed to send email. Error: Mail error: connection refused"
        );
        assert_eq!(mailer.open.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_marked_as_side_effecting() {
        let tool = SendEmailTool::new(Arc::new(RecordingMailer::new(Outcome::Deliver)));
        let schema = tool.schema();
        assert!(schema.has_side_effects);
        assert_eq!(schema.parameters.len(), 3);
    }
}
