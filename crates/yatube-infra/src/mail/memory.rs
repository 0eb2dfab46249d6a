//! In-memory mail outbox - keeps sent messages for inspection.

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{EmailMessage, MailError, Mailer};

#[derive(Debug, Default)]
pub struct InMemoryMailer {
    outbox: RwLock<Vec<EmailMessage>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        self.outbox.write().await.push(message);
        Ok(())
    }
}
