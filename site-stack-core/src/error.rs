//! Errors raised while declaring and synthesizing stacks

use serde::Serialize;
use thiserror::Error;

pub use site_stack_provider::ProviderError;

/// Any failure of a synthesis run. Nothing is written once one is returned.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No domain name configured for the composed app
    #[error("DOMAIN_NAME environment variable is required")]
    MissingDomainName,

    /// The domain stack targets a region other than the certificate region
    #[error("{stack} must be in {required}, got {actual}")]
    WrongRegion {
        stack: String,
        required: String,
        actual: String,
    },

    /// Records file lacks a top-level `records` array
    #[error("Invalid DNS records structure: missing or invalid \"records\" array")]
    InvalidRecordsStructure,

    /// A single record declaration failed validation
    #[error("{reason}: {record}")]
    InvalidRecord { reason: String, record: String },

    /// Configuration file could not be read
    #[error("Failed to read {path}: {detail}")]
    ConfigRead { path: String, detail: String },

    /// A template or manifest could not be rendered to JSON
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Inconsistent stack declaration (dangling reference, cycle, mismatched props)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Asset directory missing or unreadable
    #[error("Asset error: {0}")]
    AssetError(String),

    /// Writing the cloud assembly failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Hosted zone lookup failed
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// 由输入或配置导致的错误（CLI 以 `warn` 记录），I/O 与序列化失败返回 `false`
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::MissingDomainName
            | Self::WrongRegion { .. }
            | Self::InvalidRecordsStructure
            | Self::InvalidRecord { .. }
            | Self::ConfigRead { .. }
            | Self::ValidationError(_)
            | Self::AssetError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_region_message() {
        let err = CoreError::WrongRegion {
            stack: "DomainStack".to_string(),
            required: "us-east-1".to_string(),
            actual: "eu-west-1".to_string(),
        };
        assert_eq!(err.to_string(), "DomainStack must be in us-east-1, got eu-west-1");
        assert!(err.is_expected());
    }

    #[test]
    fn invalid_record_message_includes_declaration() {
        let err = CoreError::InvalidRecord {
            reason: "Invalid DNS record missing \"type\"".to_string(),
            record: r#"{"name":"example.com"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Invalid DNS record missing "type": {"name":"example.com"}"#
        );
    }

    #[test]
    fn provider_errors_keep_classification() {
        let err: CoreError = ProviderError::NetworkError {
            provider: "route53".to_string(),
            detail: "connection reset".to_string(),
        }
        .into();
        assert!(!err.is_expected());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn serializes_with_code_tag() {
        let value = serde_json::to_value(CoreError::MissingDomainName).unwrap_or_default();
        assert_eq!(value["code"], "MissingDomainName");
    }
}
