use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all zone lookup operations.
///
/// `provider` names the backend that failed (`route53`, `context`, `static`).
/// `raw_*` fields carry the backend's own code and message when it sent one.
///
/// Lookups are never retried: a zone lookup runs once per synthesis, and a failure
/// aborts the run before anything is written.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection or server-side failure (refused, reset, 5xx).
    #[error("[{provider}] Network error: {detail}")]
    NetworkError {
        provider: String,
        detail: String,
    },

    #[error("[{provider}] Request timed out: {detail}")]
    Timeout {
        provider: String,
        detail: String,
    },

    /// No credentials were found for a backend that needs them.
    #[error("[{provider}] Missing credentials: {variable} is not set")]
    MissingCredentials {
        provider: String,
        /// Name of the missing environment variable.
        variable: String,
    },

    /// Credentials rejected by the API (bad signature, expired token).
    #[error("[{provider}] Invalid credentials{}", raw_suffix(.raw_message))]
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// The authenticated principal lacks permission for the lookup.
    #[error("[{provider}] Permission denied{}", raw_suffix(.raw_message))]
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429 or `Throttling`).
    #[error("[{provider}] Rate limited{}", raw_suffix(.raw_message))]
    RateLimited {
        provider: String,
        /// Suggested wait time in seconds, if provided by the API.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// No hosted zone with the requested name exists.
    #[error("[{provider}] Hosted zone not found: {domain}{}", raw_suffix(.raw_message))]
    ZoneNotFound {
        provider: String,
        /// Domain name that was looked up.
        domain: String,
        raw_message: Option<String>,
    },

    /// A lookup parameter is invalid (e.g., empty domain name).
    #[error("[{provider}] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        provider: String,
        param: String,
        detail: String,
    },

    /// Failed to parse the backend's response or cached data.
    #[error("[{provider}] Parse error: {detail}")]
    ParseError {
        provider: String,
        detail: String,
    },

    /// Failed to serialize data for storage.
    #[error("[{provider}] Serialization error: {detail}")]
    SerializationError {
        provider: String,
        detail: String,
    },

    /// Reading or writing the lookup cache failed.
    #[error("[{provider}] Storage error: {detail}")]
    StorageError {
        provider: String,
        detail: String,
    },

    /// An unrecognized error from the backend API.
    #[error("[{provider}] Unknown error{}: {raw_message}", code_suffix(.raw_code))]
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

fn raw_suffix(raw_message: &Option<String>) -> String {
    raw_message
        .as_ref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

fn code_suffix(raw_code: &Option<String>) -> String {
    raw_code
        .as_ref()
        .map(|code| format!(" ({code})"))
        .unwrap_or_default()
}

impl ProviderError {
    /// 由使用者配置或账户状态导致的错误记为 `warn`，其余记为 `error`
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. }
                | Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::ZoneNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// 产生该错误的后端标识
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::MissingCredentials { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::ZoneNotFound { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::StorageError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
