use async_trait::async_trait;

use yatube_core::ports::{EmailMessage, MailError, Mailer};

/// Writes every message to the log instead of sending it.
#[derive(Debug, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Outgoing email:\n{}",
            message.body
        );
        Ok(())
    }
}
