use thiserror::Error;

/// Errors that can occur while building or delivering mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// An address could not be parsed into a mailbox.
    #[error("invalid mail address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message itself could not be assembled.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP transport refused or failed to deliver.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A non-SMTP backend rejected the message.
    #[error("mail delivery rejected: {0}")]
    Rejected(String),
}
