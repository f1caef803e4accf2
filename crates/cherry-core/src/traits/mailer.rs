//! Outbound mail transport trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A fully rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// `From` mailbox, e.g. `Cherry Studio <noreply@example.com>`.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

/// Delivers mail. Failures are returned, never retried.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Transport name for logging ("log", "http", "memory").
    fn transport(&self) -> &str;

    /// Deliver one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}
