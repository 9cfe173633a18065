//! Zone lookup backends

/// Shared utilities used by lookup implementations.
pub mod common;

mod context;
mod fixed;
#[cfg(feature = "route53")]
mod route53;

pub use context::{ContextLookup, DEFAULT_CONTEXT_FILE};
pub use fixed::StaticZoneLookup;
#[cfg(feature = "route53")]
pub use route53::{Route53Credentials, Route53Lookup, Route53LookupBuilder};
