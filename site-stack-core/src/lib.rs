//! Site Stack Core Library
//!
//! Declares the infrastructure of a static website and synthesizes it into a
//! cloud assembly:
//! - Domain stack: hosted zone lookup, DNS records from a JSON file, wildcard certificate
//! - Website stack: private bucket, CDN distribution, alias records, asset deployment
//! - [`SiteApp`]: stack composition, cross-stack references and assembly output
//!
//! The only remote call is the hosted zone lookup, abstracted behind
//! [`site_stack_provider::ZoneLookup`].

pub mod app;
pub mod compose;
pub mod config;
pub mod error;
pub mod resources;
pub mod services;
pub mod stacks;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use app::SiteApp;
pub use compose::{compose_site, SiteMode};
pub use config::AppConfig;
pub use error::{CoreError, CoreResult};
pub use stacks::{
    CertificateRef, DomainStack, DomainStackProps, Stack, WebsiteStack, WebsiteStackProps,
    DOMAIN_STACK_ID, WEBSITE_STACK_ID,
};

// Re-export lookup crate
pub use site_stack_provider;
