use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{HostedZone, ZoneLookupQuery};

/// 后端返回的失败响应（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ApiFailure {
    /// 后端错误码，如 `AccessDenied`
    pub code: Option<String>,
    pub message: String,
    /// 出错时正在查询的域名
    pub domain: Option<String>,
}

impl ApiFailure {
    /// 无法识别错误码的失败（如非 XML 响应体）
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::uncoded(message)
        }
    }

    pub fn during_lookup_of(mut self, domain: Option<&str>) -> Self {
        self.domain = domain.map(str::to_string);
        self
    }
}

/// Maps backend failures onto [`ProviderError`] (internal).
pub(crate) trait ClassifyFailure {
    /// Backend label carried by every produced error.
    fn backend(&self) -> &'static str;

    fn classify(&self, failure: ApiFailure) -> ProviderError;

    /// 无法归类时保留原始错误码和消息
    fn unclassified(&self, failure: ApiFailure) -> ProviderError {
        ProviderError::Unknown {
            provider: self.backend().to_string(),
            raw_code: failure.code,
            raw_message: failure.message,
        }
    }
}

/// Hosted zone lookup backend.
///
/// A lookup resolves an existing zone by its exact name. The zone itself is never
/// created or modified; its lifecycle is external to the stacks.
#[async_trait]
pub trait ZoneLookup: Send + Sync {
    /// 后端标识符
    fn id(&self) -> &'static str;

    /// 按名称精确查找托管区域
    ///
    /// 未找到时返回 [`ProviderError::ZoneNotFound`]。
    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone>;
}
