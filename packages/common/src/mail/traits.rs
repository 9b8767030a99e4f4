use async_trait::async_trait;

use super::error::MailError;

/// A single outbound email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address, either bare (`a@b.c`) or named (`Name <a@b.c>`).
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
