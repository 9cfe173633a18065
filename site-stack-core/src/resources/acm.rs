//! ACM certificates

use serde_json::json;

use crate::types::{HostedZone, Resource};

pub const CERTIFICATE_TYPE: &str = "AWS::CertificateManager::Certificate";

/// Certificate for `domain` and `*.domain`, validated through DNS records in `zone`.
pub fn wildcard_certificate(domain_name: &str, zone: &HostedZone) -> Resource {
    Resource::new(CERTIFICATE_TYPE)
        .property("DomainName", json!(domain_name))
        .property("SubjectAlternativeNames", json!([format!("*.{domain_name}")]))
        .property(
            "DomainValidationOptions",
            json!([
                { "DomainName": domain_name, "HostedZoneId": zone.zone_id() },
                { "DomainName": format!("*.{domain_name}"), "HostedZoneId": zone.zone_id() },
            ]),
        )
        .property("ValidationMethod", json!("DNS"))
        .property("Tags", json!([{ "Key": "Name", "Value": domain_name }]))
}
