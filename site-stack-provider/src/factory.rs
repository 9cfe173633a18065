//! Zone lookup factory.

use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "route53")]
use async_trait::async_trait;
#[cfg(feature = "route53")]
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::providers::ContextLookup;
use crate::traits::ZoneLookup;
#[cfg(feature = "route53")]
use crate::types::{HostedZone, ZoneLookupQuery};

#[cfg(feature = "route53")]
use crate::providers::{Route53Credentials, Route53Lookup};

/// Options for [`create_zone_lookup`].
#[derive(Debug, Clone, Default)]
pub struct LookupOptions {
    /// Context file caching lookup results. `None` disables caching.
    pub context_file: Option<PathBuf>,
    /// Only answer from the context file; never call the remote API.
    pub offline: bool,
    /// Explicit Route53 credentials. `None` reads `AWS_*` variables.
    #[cfg(feature = "route53")]
    pub credentials: Option<Route53Credentials>,
    /// Route53 endpoint override.
    #[cfg(feature = "route53")]
    pub endpoint: Option<String>,
}

/// Creates a [`ZoneLookup`] for the given options.
///
/// - offline: a cache-only [`ContextLookup`] over `context_file`
///   (or `cdk.context.json`)
/// - online with a context file: a [`ContextLookup`] in front of Route53;
///   credentials are only read on a cache miss
/// - online without a context file: a bare Route53 lookup
///
/// # Examples
///
/// ```rust,no_run
/// use site_stack_provider::{create_zone_lookup, LookupOptions};
///
/// let lookup = create_zone_lookup(LookupOptions {
///     context_file: Some("cdk.context.json".into()),
///     offline: true,
///     ..Default::default()
/// })
/// .unwrap();
/// ```
pub fn create_zone_lookup(options: LookupOptions) -> Result<Arc<dyn ZoneLookup>> {
    if options.offline {
        let path = options
            .context_file
            .unwrap_or_else(|| PathBuf::from(crate::providers::DEFAULT_CONTEXT_FILE));
        log::debug!("[factory] Offline zone lookup from {}", path.display());
        return Ok(Arc::new(ContextLookup::new(path)));
    }

    match options.context_file.clone() {
        Some(path) => Ok(Arc::new(ContextLookup::with_inner(
            path,
            deferred_remote_lookup(&options)?,
        ))),
        None => create_remote_lookup(&options),
    }
}

#[cfg(feature = "route53")]
fn build_route53(
    options: &LookupOptions,
    read_credentials: fn() -> Result<Route53Credentials>,
) -> Result<Route53Lookup> {
    let credentials = match &options.credentials {
        Some(credentials) => credentials.clone(),
        None => read_credentials()?,
    };
    let mut builder = Route53Lookup::builder(credentials);
    if let Some(endpoint) = &options.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    builder.build()
}

#[cfg(feature = "route53")]
fn create_remote_lookup(options: &LookupOptions) -> Result<Arc<dyn ZoneLookup>> {
    Ok(Arc::new(build_route53(options, Route53Credentials::from_env)?))
}

#[cfg(feature = "route53")]
fn deferred_remote_lookup(options: &LookupOptions) -> Result<Arc<dyn ZoneLookup>> {
    Ok(Arc::new(DeferredRoute53::new(
        options.clone(),
        Route53Credentials::from_env,
    )))
}

/// Route53 backend built on its first lookup.
///
/// Sits behind the context cache so that cached zones resolve without
/// `AWS_*` credentials.
#[cfg(feature = "route53")]
struct DeferredRoute53 {
    options: LookupOptions,
    read_credentials: fn() -> Result<Route53Credentials>,
    backend: OnceCell<Route53Lookup>,
}

#[cfg(feature = "route53")]
impl DeferredRoute53 {
    fn new(options: LookupOptions, read_credentials: fn() -> Result<Route53Credentials>) -> Self {
        Self {
            options,
            read_credentials,
            backend: OnceCell::new(),
        }
    }
}

#[cfg(feature = "route53")]
#[async_trait]
impl ZoneLookup for DeferredRoute53 {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone> {
        let backend = self
            .backend
            .get_or_try_init(|| async { build_route53(&self.options, self.read_credentials) })
            .await?;
        backend.lookup_hosted_zone(query).await
    }
}

#[cfg(not(feature = "route53"))]
fn deferred_remote_lookup(options: &LookupOptions) -> Result<Arc<dyn ZoneLookup>> {
    create_remote_lookup(options)
}

#[cfg(not(feature = "route53"))]
fn create_remote_lookup(_options: &LookupOptions) -> Result<Arc<dyn ZoneLookup>> {
    Err(crate::error::ProviderError::InvalidParameter {
        provider: "factory".to_string(),
        param: "offline".to_string(),
        detail: "remote lookups require the `route53` feature".to_string(),
    })
}
