//! CloudFront distributions

use serde_json::{json, Value};

use crate::types::{fn_get_att, Resource};

pub const DISTRIBUTION_TYPE: &str = "AWS::CloudFront::Distribution";
pub const ORIGIN_ACCESS_CONTROL_TYPE: &str = "AWS::CloudFront::OriginAccessControl";

/// Managed `CachingOptimized` cache policy.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// ID of the single S3 origin inside the distribution config.
pub const S3_ORIGIN_ID: &str = "origin1";

/// Edge location coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceClass {
    /// North America and Europe
    PriceClass100,
    /// Adds Asia, Middle East and Africa
    PriceClass200,
    All,
}

impl PriceClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceClass100 => "PriceClass_100",
            Self::PriceClass200 => "PriceClass_200",
            Self::All => "PriceClass_All",
        }
    }
}

/// Rewrite of an origin error status to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
}

impl ErrorResponse {
    pub fn new(error_code: u16, response_code: u16, page: impl Into<String>) -> Self {
        Self {
            error_code,
            response_code,
            response_page_path: page.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "ErrorCode": self.error_code,
            "ResponseCode": self.response_code,
            "ResponsePagePath": self.response_page_path,
        })
    }
}

/// Distribution-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSettings {
    pub comment: String,
    pub default_root_object: String,
    pub price_class: PriceClass,
    pub error_responses: Vec<ErrorResponse>,
    /// Custom domain names; empty for the default `*.cloudfront.net` name only.
    pub aliases: Vec<String>,
    /// Certificate ARN expression, required when `aliases` is non-empty.
    pub certificate_arn: Option<Value>,
}

/// Origin access control signing every request to an S3 origin.
pub fn origin_access_control(name: &str) -> Resource {
    Resource::new(ORIGIN_ACCESS_CONTROL_TYPE).property(
        "OriginAccessControlConfig",
        json!({
            "Name": name,
            "OriginAccessControlOriginType": "s3",
            "SigningBehavior": "always",
            "SigningProtocol": "sigv4",
        }),
    )
}

/// Distribution with `bucket_id` as its only origin.
pub fn s3_distribution(bucket_id: &str, oac_id: &str, settings: &DistributionSettings) -> Resource {
    let mut config = json!({
        "Comment": settings.comment,
        "CustomErrorResponses": settings
            .error_responses
            .iter()
            .map(ErrorResponse::to_value)
            .collect::<Vec<_>>(),
        "DefaultCacheBehavior": {
            "CachePolicyId": CACHING_OPTIMIZED_POLICY_ID,
            "Compress": true,
            "TargetOriginId": S3_ORIGIN_ID,
            "ViewerProtocolPolicy": "allow-all",
        },
        "DefaultRootObject": settings.default_root_object,
        "Enabled": true,
        "HttpVersion": "http2",
        "IPV6Enabled": true,
        "Origins": [{
            "DomainName": fn_get_att(bucket_id, "RegionalDomainName"),
            "Id": S3_ORIGIN_ID,
            "OriginAccessControlId": fn_get_att(oac_id, "Id"),
            "S3OriginConfig": { "OriginAccessIdentity": "" },
        }],
        "PriceClass": settings.price_class.as_str(),
    });

    if let Some(obj) = config.as_object_mut() {
        if !settings.aliases.is_empty() {
            obj.insert("Aliases".to_string(), json!(settings.aliases));
        }
        if let Some(arn) = &settings.certificate_arn {
            obj.insert(
                "ViewerCertificate".to_string(),
                json!({
                    "AcmCertificateArn": arn,
                    "MinimumProtocolVersion": "TLSv1.2_2021",
                    "SslSupportMethod": "sni-only",
                }),
            );
        }
    }

    Resource::new(DISTRIBUTION_TYPE).property("DistributionConfig", config)
}
