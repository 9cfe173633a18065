//! Context-file backed zone lookup
//!
//! Lookup results are cached in a JSON context file (`cdk.context.json` by
//! default) so repeated syntheses are deterministic and need no network access.
//!
//! ```json
//! {
//!   "hosted-zone:account=123456789012:domainName=example.com:region=us-east-1": {
//!     "Id": "/hostedzone/Z0123456789ABC",
//!     "Name": "example.com."
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{ProviderError, Result};
use crate::traits::ZoneLookup;
use crate::types::{HostedZone, ZoneLookupQuery};

const PROVIDER: &str = "context";

/// Default context file name.
pub const DEFAULT_CONTEXT_FILE: &str = "cdk.context.json";

/// Zone lookup that consults a context file before an optional inner lookup.
///
/// A cache hit never touches the inner lookup. A miss delegates to the inner
/// lookup and writes the result back; without an inner lookup a miss is a
/// [`ProviderError::ZoneNotFound`].
pub struct ContextLookup {
    path: PathBuf,
    inner: Option<Arc<dyn ZoneLookup>>,
    /// 串行化读-改-写，避免同一进程内并发写入丢失条目
    write_lock: Mutex<()>,
}

impl ContextLookup {
    /// Cache-only lookup (offline mode).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Cache in front of `inner`.
    pub fn with_inner(path: impl Into<PathBuf>, inner: Arc<dyn ZoneLookup>) -> Self {
        Self {
            path: path.into(),
            inner: Some(inner),
            write_lock: Mutex::new(()),
        }
    }

    /// Context file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取上下文文件；文件不存在时视为空
    async fn read_context(&self) -> Result<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(ProviderError::StorageError {
                    provider: PROVIDER.to_string(),
                    detail: format!("Failed to read {}: {e}", self.path.display()),
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ProviderError::ParseError {
                provider: PROVIDER.to_string(),
                detail: format!("{} is not a JSON object", self.path.display()),
            }),
            Err(e) => Err(ProviderError::ParseError {
                provider: PROVIDER.to_string(),
                detail: format!("{}: {e}", self.path.display()),
            }),
        }
    }

    /// Look up a cached entry.
    pub async fn cached(&self, query: &ZoneLookupQuery) -> Result<Option<HostedZone>> {
        let key = query.context_key();
        let context = self.read_context().await?;

        let Some(value) = context.get(&key) else {
            return Ok(None);
        };

        serde_json::from_value::<HostedZone>(value.clone())
            .map(Some)
            .map_err(|e| ProviderError::ParseError {
                provider: PROVIDER.to_string(),
                detail: format!("Invalid cached value for {key}: {e}"),
            })
    }

    /// Store a lookup result, keeping every other entry of the file.
    pub async fn store(&self, query: &ZoneLookupQuery, zone: &HostedZone) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut context = self.read_context().await?;
        let value = serde_json::to_value(zone).map_err(|e| ProviderError::SerializationError {
            provider: PROVIDER.to_string(),
            detail: e.to_string(),
        })?;
        context.insert(query.context_key(), value);

        let mut content = serde_json::to_string_pretty(&Value::Object(context)).map_err(|e| {
            ProviderError::SerializationError {
                provider: PROVIDER.to_string(),
                detail: e.to_string(),
            }
        })?;
        content.push('\n');

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ProviderError::StorageError {
                provider: PROVIDER.to_string(),
                detail: format!("Failed to write {}: {e}", self.path.display()),
            })?;

        log::debug!(
            "[context] Stored {} in {}",
            query.context_key(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl ZoneLookup for ContextLookup {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone> {
        if let Some(zone) = self.cached(query).await? {
            log::debug!("[context] Cache hit for {}", query.context_key());
            return Ok(zone);
        }

        let Some(inner) = &self.inner else {
            return Err(ProviderError::ZoneNotFound {
                provider: PROVIDER.to_string(),
                domain: query.normalized_domain().to_string(),
                raw_message: Some(format!(
                    "no cached entry in {} and remote lookups are disabled",
                    self.path.display()
                )),
            });
        };

        log::info!(
            "[context] Cache miss for {}, querying {}",
            query.normalized_domain(),
            inner.id()
        );
        let zone = inner.lookup_hosted_zone(query).await?;
        self.store(query, &zone).await?;
        Ok(zone)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::providers::StaticZoneLookup;
    use crate::types::AwsEnvironment;

    /// 记录调用次数的内层查询
    struct CountingLookup {
        inner: StaticZoneLookup,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ZoneLookup for CountingLookup {
        fn id(&self) -> &'static str {
            "counting"
        }

        async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup_hosted_zone(query).await
        }
    }

    fn query() -> ZoneLookupQuery {
        ZoneLookupQuery::new(
            "example.com",
            AwsEnvironment::new(Some("123456789012".into()), Some("us-east-1".into())),
        )
    }

    #[tokio::test]
    async fn hit_skips_inner_lookup() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let path = dir.path().join(DEFAULT_CONTEXT_FILE);
        let content = serde_json::json!({
            "hosted-zone:account=123456789012:domainName=example.com:region=us-east-1": {
                "Id": "/hostedzone/ZCACHED",
                "Name": "example.com."
            },
            "unrelated": 1
        });
        assert!(std::fs::write(&path, content.to_string()).is_ok());

        let inner = Arc::new(CountingLookup {
            inner: StaticZoneLookup::new(),
            calls: AtomicUsize::new(0),
        });
        let lookup = ContextLookup::with_inner(&path, inner.clone());

        let zone = lookup.lookup_hosted_zone(&query()).await;
        assert!(zone.is_ok(), "lookup failed: {zone:?}");
        let Ok(zone) = zone else {
            return;
        };
        assert_eq!(zone.zone_id(), "ZCACHED");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn miss_delegates_and_stores() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let path = dir.path().join(DEFAULT_CONTEXT_FILE);
        assert!(std::fs::write(&path, r#"{"other-key": "kept"}"#).is_ok());

        let inner = Arc::new(CountingLookup {
            inner: StaticZoneLookup::new()
                .with_zone(HostedZone::new("/hostedzone/ZREMOTE", "example.com.")),
            calls: AtomicUsize::new(0),
        });
        let lookup = ContextLookup::with_inner(&path, inner.clone());

        let first = lookup.lookup_hosted_zone(&query()).await;
        assert!(first.is_ok());
        let second = lookup.lookup_hosted_zone(&query()).await;
        assert!(second.is_ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        let written = std::fs::read_to_string(&path).unwrap_or_default();
        let value: Value = serde_json::from_str(&written).unwrap_or_default();
        assert_eq!(value["other-key"], "kept");
        assert_eq!(
            value[query().context_key()]["Id"],
            "/hostedzone/ZREMOTE"
        );
    }

    #[tokio::test]
    async fn offline_miss_is_zone_not_found() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let lookup = ContextLookup::new(dir.path().join("missing.json"));
        let result = lookup.lookup_hosted_zone(&query()).await;
        assert!(matches!(
            result,
            Err(ProviderError::ZoneNotFound { ref domain, .. }) if domain == "example.com"
        ));
    }

    #[tokio::test]
    async fn malformed_context_is_parse_error() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let path = dir.path().join(DEFAULT_CONTEXT_FILE);
        assert!(std::fs::write(&path, "[1, 2]").is_ok());
        let result = ContextLookup::new(&path).lookup_hosted_zone(&query()).await;
        assert!(matches!(result, Err(ProviderError::ParseError { .. })));
    }
}
