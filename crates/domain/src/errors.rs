//! Error types used throughout the adapter

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the IAS adapter
///
/// Variants classify the failure; the payload carries the human readable
/// message including any operation context added on the way up.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IasAdapterError {
    /// Webhook body is structurally valid JSON but incomplete or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Body could not be deserialized at all.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    /// IAS returned zero applications for a client id.
    #[error("IAS application not found: {0}")]
    IasApplicationNotFound(String),

    /// IAS returned more than one application for a client id.
    #[error("ambiguous IAS application: {0}")]
    AmbiguousIasApplication(String),

    /// An S4 participant has no default credential registered in IAS yet.
    #[error("missing default credential: {0}")]
    MissingDefaultCredential(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IasAdapterError {
    /// Prefix the message with operation context while keeping the variant.
    ///
    /// ```
    /// use ias_adapter_domain::IasAdapterError;
    ///
    /// let err = IasAdapterError::Database("connection reset".into())
    ///     .context("failed to upsert tenant mapping");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "database error: failed to upsert tenant mapping: connection reset"
    /// );
    /// ```
    #[must_use]
    pub fn context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();
        let wrap = |message: String| format!("{context}: {message}");

        match self {
            Self::Validation(m) => Self::Validation(wrap(m)),
            Self::InvalidInput(m) => Self::InvalidInput(wrap(m)),
            Self::Database(m) => Self::Database(wrap(m)),
            Self::NotFound(m) => Self::NotFound(wrap(m)),
            Self::AlreadyExists(m) => Self::AlreadyExists(wrap(m)),
            Self::IasApplicationNotFound(m) => Self::IasApplicationNotFound(wrap(m)),
            Self::AmbiguousIasApplication(m) => Self::AmbiguousIasApplication(wrap(m)),
            Self::MissingDefaultCredential(m) => Self::MissingDefaultCredential(wrap(m)),
            Self::Network(m) => Self::Network(wrap(m)),
            Self::Serialization(m) => Self::Serialization(wrap(m)),
            Self::Config(m) => Self::Config(wrap(m)),
            Self::Auth(m) => Self::Auth(wrap(m)),
            Self::Internal(m) => Self::Internal(wrap(m)),
        }
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidInput(_) => "invalid_input",
            Self::Database(_) => "database",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::IasApplicationNotFound(_) => "ias_application_not_found",
            Self::AmbiguousIasApplication(_) => "ambiguous_ias_application",
            Self::MissingDefaultCredential(_) => "missing_default_credential",
            Self::Network(_) => "network",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for IasAdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for attaching context to domain results.
pub trait ResultExt<T> {
    /// Wrap the error (if any) with `context`, keeping its variant.
    fn context(self, context: impl AsRef<str>) -> Result<T>;

    /// Like [`ResultExt::context`] but builds the message lazily.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: AsRef<str>,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl AsRef<str>) -> Result<T> {
        self.map_err(|err| err.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: AsRef<str>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.context(f()))
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, IasAdapterError>;
