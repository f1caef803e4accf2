//! Error type shared by every crate in the workspace.
//!
//! Failures travel up as [`AppError`] and the HTTP layer picks a status code
//! from its [`ErrorKind`] alone.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// What went wrong, at the granularity the API boundary cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    /// Missing, malformed or expired credential, or an unknown subject.
    Authentication,
    /// The caller's role lacks the required capability.
    Authorization,
    Validation,
    /// A business rule was violated (duplicate email, last admin, ...).
    Conflict,
    Internal,
    Database,
    Storage,
    Configuration,
    Serialization,
    /// The mail relay or object store failed.
    ExternalService,
}

impl ErrorKind {
    /// Stable snake_case name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::Database => "database",
            Self::Storage => "storage",
            Self::Configuration => "configuration",
            Self::Serialization => "serialization",
            Self::ExternalService => "external_service",
        }
    }

    /// True when the request itself was at fault.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::Authentication
                | Self::Authorization
                | Self::Validation
                | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Cause = Arc<dyn StdError + Send + Sync>;

/// A categorised failure with a client-facing message.
///
/// The optional cause is kept for logging only and never rendered to clients.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )+
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a foreign error, keeping it as the cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    kind_constructors! {
        not_found => NotFound;
        authentication => Authentication;
        authorization => Authorization;
        validation => Validation;
        /// A rule over existing data refused the change.
        conflict => Conflict;
        internal => Internal;
        database => Database;
        storage => Storage;
        configuration => Configuration;
        /// The message is shown to clients even though the status is 500.
        external => ExternalService;
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Malformed JSON: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("Filesystem operation failed: {err}");
        Self::with_source(ErrorKind::Storage, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Could not load configuration: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}
