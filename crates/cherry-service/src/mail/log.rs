//! Mail transport that writes a log line instead of delivering.

use async_trait::async_trait;
use tracing::{debug, info};

use cherry_core::result::AppResult;
use cherry_core::traits::{MailMessage, Mailer};

/// Logs outgoing mail. The body may carry a secret link, so it is only
/// emitted at debug level.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Create the transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn transport(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(to = %message.to, subject = %message.subject, "Mail not delivered (log transport)");
        debug!(body = %message.text, "Mail body");
        Ok(())
    }
}
