mod error;
mod traits;

pub mod console;
pub mod memory;
pub mod smtp;

pub use error::MailError;
pub use traits::{Mailer, OutboundEmail};
