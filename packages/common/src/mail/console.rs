use async_trait::async_trait;
use tracing::{debug, info};

use super::error::MailError;
use super::traits::{Mailer, OutboundEmail};

/// Logs outbound mail instead of delivering it.
///
/// Stands in for a real transport when mail is disabled, so the rest of
/// the pipeline behaves identically in development.
#[derive(Debug, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "Outbound email (mail disabled)");
        debug!(body = %email.html_body, "Outbound email body");
        Ok(())
    }
}
