//! # site-stack-provider
//!
//! Hosted zone lookup backends used while synthesizing site stacks.
//!
//! A stack that attaches records or a certificate to an existing DNS zone
//! needs that zone's ID at synthesis time. This crate resolves it.
//!
//! ## Backends
//!
//! | Backend | Type | Source |
//! |---------|------|--------|
//! | Route53 | [`Route53Lookup`] | `ListHostedZonesByName`, SigV4-signed |
//! | Context cache | [`ContextLookup`] | `cdk.context.json`, optionally in front of another backend |
//! | Static | [`StaticZoneLookup`] | Fixed in-memory zones |
//!
//! ## Features
//!
//! - **`route53`** *(default)*: enable the Route53 backend.
//! - **`rustls`** *(default)*: use rustls for HTTPS.
//! - **`native-tls`**: use the platform's native TLS implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use site_stack_provider::{
//!     create_zone_lookup, AwsEnvironment, LookupOptions, ZoneLookupQuery,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Route53 behind the context cache; credentials come from AWS_* variables
//!     let lookup = create_zone_lookup(LookupOptions {
//!         context_file: Some("cdk.context.json".into()),
//!         ..Default::default()
//!     })?;
//!
//!     let env = AwsEnvironment::new(Some("123456789012".into()), Some("us-east-1".into()));
//!     let zone = lookup
//!         .lookup_hosted_zone(&ZoneLookupQuery::new("example.com", env))
//!         .await?;
//!     println!("{} -> {}", zone.zone_name(), zone.zone_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! All lookups return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::MissingCredentials`]: an `AWS_*` variable is not set
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::ZoneNotFound`]: no zone with that exact name
//! - [`ProviderError::NetworkError`]: network connectivity issue
//!
//! Requests are never retried.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::{LookupOptions, create_zone_lookup};

// 错误分类 trait 仅在 crate 内部使用
pub use traits::ZoneLookup;

pub use types::{
    AwsEnvironment, CERTIFICATE_REGION, DnsRecordType, HostedZone, UnknownRecordType,
    ZoneLookupQuery,
};

pub use providers::{ContextLookup, DEFAULT_CONTEXT_FILE, StaticZoneLookup};

#[cfg(feature = "route53")]
pub use providers::{Route53Credentials, Route53Lookup, Route53LookupBuilder};

pub use utils::log_sanitizer;
