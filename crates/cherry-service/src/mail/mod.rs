//! Outbound mail: transports and the password-reset message.

pub mod http;
pub mod log;
pub mod memory;

use std::sync::Arc;

use cherry_core::config::{MailConfig, MailTransport};
use cherry_core::result::AppResult;
use cherry_core::traits::{MailMessage, Mailer};

pub use self::http::HttpMailer;
pub use self::log::LogMailer;
pub use self::memory::MemoryMailer;

/// Subject line of the password-reset email.
pub const RESET_SUBJECT: &str = "Cherry Studio password reset";

/// Build the transport selected by `mail.transport`.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.transport {
        MailTransport::Log => Arc::new(LogMailer::new()),
        MailTransport::Http => Arc::new(HttpMailer::new(&config.http)?),
        MailTransport::Memory => Arc::new(MemoryMailer::new()),
    };
    Ok(mailer)
}

/// Compose the password-reset email for `name` at `to`.
pub fn reset_message(
    from: &str,
    to: &str,
    name: &str,
    reset_url: &str,
    ttl_minutes: u64,
) -> MailMessage {
    let text = format!(
        "Hi {name},\n\n\
         We received a request to reset the password for your Cherry Studio account.\n\
         Open the link below to choose a new password. It is valid for {ttl_minutes} minutes.\n\n\
         {reset_url}\n\n\
         If you did not ask for this, you can ignore this email and your password stays the same.\n"
    );
    MailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: RESET_SUBJECT.to_string(),
        text,
    }
}
