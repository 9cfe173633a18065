//! Route53 record sets

use serde_json::{json, Value};

use crate::types::{fully_qualified, fn_get_att, HostedZone, RecordSet, Resource};

pub const RECORD_SET_TYPE: &str = "AWS::Route53::RecordSet";

/// Hosted zone ID used by every CloudFront alias target.
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// A plain value record.
pub fn record_set(zone: &HostedZone, record: &RecordSet) -> Resource {
    Resource::new(RECORD_SET_TYPE)
        .property("HostedZoneId", json!(zone.zone_id()))
        .property("Name", json!(record.fqdn(zone.zone_name())))
        .property("Type", json!(record.record_type.as_str()))
        .property("TTL", json!(record.ttl.to_string()))
        .property("ResourceRecords", json!(record.values))
}

/// An `A` alias record pointing at a distribution.
pub fn distribution_alias(
    zone: &HostedZone,
    record_name: Option<&str>,
    distribution_id: &str,
) -> Resource {
    Resource::new(RECORD_SET_TYPE)
        .property("HostedZoneId", json!(zone.zone_id()))
        .property("Name", json!(fully_qualified(record_name, zone.zone_name())))
        .property("Type", json!("A"))
        .property("AliasTarget", alias_target(distribution_id))
}

fn alias_target(distribution_id: &str) -> Value {
    json!({
        "DNSName": fn_get_att(distribution_id, "DomainName"),
        "HostedZoneId": CLOUDFRONT_HOSTED_ZONE_ID,
    })
}
