//! In-process outbox transport.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::traits::{MailMessage, Mailer};

/// Keeps delivered messages in memory. Can be switched into a failing mode
/// to exercise delivery-error paths.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<MailMessage>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages delivered so far, oldest first.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.lock().await.clone()
    }

    /// The most recent message to `to`.
    pub async fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.outbox
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    fn transport(&self) -> &str {
        "memory"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external("Mail transport unavailable"));
        }
        self.outbox.lock().await.push(message.clone());
        Ok(())
    }
}
