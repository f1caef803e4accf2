//! Mail transport that POSTs messages to an HTTP relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use cherry_core::config::HttpMailConfig;
use cherry_core::error::{AppError, ErrorKind};
use cherry_core::result::AppResult;
use cherry_core::traits::{MailMessage, Mailer};

/// Delivers mail by sending the message as JSON to a relay endpoint.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for HttpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailer")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpMailer {
    /// Create the transport with a client bounded by the configured timeout.
    pub fn new(config: &HttpMailConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration(
                "mail.http.endpoint is required for the http transport",
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build mail client", e)
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    fn transport(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Mail relay unreachable", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "Mail relay rejected message: {status} {body}"
            )));
        }
        debug!(to = %message.to, "Mail handed to relay");
        Ok(())
    }
}
