//! Route53 `ZoneLookup` trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::same_domain;
use crate::traits::ZoneLookup;
use crate::types::{HostedZone, ZoneLookupQuery};

use super::types::{ListHostedZonesByNameResponse, Route53HostedZone};
use super::{ROUTE53_API_VERSION, ROUTE53_SERVICE, Route53Lookup};

/// 同名的公有区域和私有区域会相邻返回，取少量条目即可覆盖两者
const LOOKUP_PAGE_SIZE: &str = "10";

impl Route53Lookup {
    /// 从按名称排序的结果中挑选名称完全一致、可见性匹配的区域
    pub(crate) fn select_zone<'a>(
        zones: &'a [Route53HostedZone],
        query: &ZoneLookupQuery,
    ) -> Option<&'a Route53HostedZone> {
        zones
            .iter()
            .find(|z| same_domain(&z.name, &query.domain_name) && z.is_private() == query.private_zone)
    }
}

#[async_trait]
impl ZoneLookup for Route53Lookup {
    fn id(&self) -> &'static str {
        ROUTE53_SERVICE
    }

    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> Result<HostedZone> {
        let domain = query.normalized_domain();
        if domain.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: ROUTE53_SERVICE.to_string(),
                param: "dnsname".to_string(),
                detail: "domain name must not be empty".to_string(),
            });
        }

        log::info!("[route53] Looking up hosted zone {domain}");

        let path = format!("/{ROUTE53_API_VERSION}/hostedzonesbyname");
        let response: ListHostedZonesByNameResponse = self
            .get(
                &path,
                &[("dnsname", domain), ("maxitems", LOOKUP_PAGE_SIZE)],
                Some(domain),
            )
            .await?;

        let zone = Self::select_zone(&response.hosted_zones.items, query).ok_or_else(|| {
            ProviderError::ZoneNotFound {
                provider: ROUTE53_SERVICE.to_string(),
                domain: domain.to_string(),
                raw_message: None,
            }
        })?;

        log::info!("[route53] Found hosted zone {} ({})", zone.name, zone.id);
        Ok(HostedZone::new(zone.id.clone(), zone.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::route53::types::HostedZoneConfig;
    use crate::types::AwsEnvironment;

    fn zone(id: &str, name: &str, private: bool) -> Route53HostedZone {
        Route53HostedZone {
            id: id.to_string(),
            name: name.to_string(),
            config: Some(HostedZoneConfig {
                private_zone: private,
            }),
        }
    }

    #[test]
    fn select_zone_requires_exact_name() {
        let zones = vec![
            zone("/hostedzone/ZSUB", "sub.example.com.", false),
            zone("/hostedzone/ZOTHER", "example.org.", false),
        ];
        let query = ZoneLookupQuery::new("example.com", AwsEnvironment::default());
        assert!(Route53Lookup::select_zone(&zones, &query).is_none());
    }

    #[test]
    fn select_zone_skips_private_zone_for_public_query() {
        let zones = vec![
            zone("/hostedzone/ZPRIV", "example.com.", true),
            zone("/hostedzone/ZPUB", "example.com.", false),
        ];
        let query = ZoneLookupQuery::new("example.com.", AwsEnvironment::default());
        let selected = Route53Lookup::select_zone(&zones, &query).map(|z| z.id.as_str());
        assert_eq!(selected, Some("/hostedzone/ZPUB"));

        let private = ZoneLookupQuery {
            private_zone: true,
            ..query
        };
        let selected = Route53Lookup::select_zone(&zones, &private).map(|z| z.id.as_str());
        assert_eq!(selected, Some("/hostedzone/ZPRIV"));
    }
}
