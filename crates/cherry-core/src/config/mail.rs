//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// How outbound mail is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Write a log line instead of sending.
    #[default]
    Log,
    /// POST the message to an HTTP mail relay.
    Http,
    /// Keep messages in an in-process outbox.
    Memory,
}

/// Mail delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Delivery transport.
    #[serde(default)]
    pub transport: MailTransport,
    /// Display name in the `From` header.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Address in the `From` header.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// HTTP relay settings.
    #[serde(default)]
    pub http: HttpMailConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::default(),
            from_name: default_from_name(),
            from_address: default_from_address(),
            http: HttpMailConfig::default(),
        }
    }
}

impl MailConfig {
    /// The formatted `From` mailbox, e.g. `Cherry Studio <noreply@example.com>`.
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

/// HTTP mail relay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpMailConfig {
    /// Relay URL accepting a JSON message.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer token for the relay.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpMailConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_from_name() -> String {
    "Cherry Studio".to_string()
}

fn default_from_address() -> String {
    "noreply@cherry-ai.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
