//! In-memory zone lookup

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_domain_name;
use crate::traits::ZoneLookup;
use crate::types::{HostedZone, ZoneLookupQuery};

const PROVIDER: &str = "static";

/// Zone lookup over a fixed set of zones.
///
/// Useful for tests and for runs where the zone ID is already known.
#[derive(Debug, Clone, Default)]
pub struct StaticZoneLookup {
    zones: HashMap<String, HostedZone>,
}

impl StaticZoneLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone under its own name.
    #[must_use]
    pub fn with_zone(mut self, zone: HostedZone) -> Self {
        self.zones.insert(Self::key(&zone.name), zone);
        self
    }

    fn key(name: &str) -> String {
        normalize_domain_name(name).to_ascii_lowercase()
    }
}

impl FromIterator<HostedZone> for StaticZoneLookup {
    fn from_iter<I: IntoIterator<Item = HostedZone>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with_zone)
    }
}

#[async_trait]
impl ZoneLookup for StaticZoneLookup {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone> {
        self.zones
            .get(&Self::key(&query.domain_name))
            .cloned()
            .ok_or_else(|| ProviderError::ZoneNotFound {
                provider: PROVIDER.to_string(),
                domain: query.normalized_domain().to_string(),
                raw_message: None,
            })
    }
}
