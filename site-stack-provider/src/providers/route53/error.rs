//! Route53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>

use crate::error::ProviderError;
use crate::traits::{ApiFailure, ClassifyFailure};

use super::{ROUTE53_SERVICE, Route53Lookup};

/// Route53 错误码的归类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    Credentials,
    Permission,
    Throttled,
    MissingZone,
    /// 参数错误，携带出错的参数名
    BadParameter(&'static str),
    ServerSide,
}

fn kind_of(code: &str) -> Option<FailureKind> {
    let kind = match code {
        "InvalidClientTokenId"
        | "SignatureDoesNotMatch"
        | "IncompleteSignature"
        | "MissingAuthenticationToken"
        | "ExpiredToken"
        | "InvalidSignatureException" => FailureKind::Credentials,
        "AccessDenied" | "AccessDeniedException" | "OptInRequired" => FailureKind::Permission,
        "Throttling" | "ThrottlingException" | "PriorRequestNotComplete" => FailureKind::Throttled,
        "NoSuchHostedZone" | "HostedZoneNotFound" => FailureKind::MissingZone,
        "InvalidDomainName" => FailureKind::BadParameter("dnsname"),
        "InvalidInput" | "InvalidParameterValue" => FailureKind::BadParameter("request"),
        "ServiceUnavailable" | "InternalFailure" => FailureKind::ServerSide,
        _ => return None,
    };
    Some(kind)
}

impl ClassifyFailure for Route53Lookup {
    fn backend(&self) -> &'static str {
        ROUTE53_SERVICE
    }

    fn classify(&self, failure: ApiFailure) -> ProviderError {
        let Some(kind) = failure.code.as_deref().and_then(kind_of) else {
            return self.unclassified(failure);
        };
        let provider = self.backend().to_string();
        let ApiFailure {
            message, domain, ..
        } = failure;

        match kind {
            FailureKind::Credentials => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(message),
            },
            FailureKind::Permission => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(message),
            },
            // Route53 的限流响应不带 Retry-After
            FailureKind::Throttled => ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(message),
            },
            FailureKind::MissingZone => ProviderError::ZoneNotFound {
                provider,
                domain: domain.unwrap_or_default(),
                raw_message: Some(message),
            },
            FailureKind::BadParameter(param) => ProviderError::InvalidParameter {
                provider,
                param: param.to_string(),
                detail: message,
            },
            FailureKind::ServerSide => ProviderError::NetworkError {
                provider,
                detail: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::route53::Route53Credentials;

    fn classify(code: &str, domain: Option<&str>) -> Option<ProviderError> {
        let lookup = Route53Lookup::new(Route53Credentials::new("id", "secret")).ok()?;
        Some(lookup.classify(ApiFailure::coded(code, "from route53").during_lookup_of(domain)))
    }

    #[test]
    fn signature_problems_are_credential_errors() {
        for code in ["InvalidClientTokenId", "SignatureDoesNotMatch", "ExpiredToken"] {
            let err = classify(code, None);
            assert!(
                matches!(err, Some(ProviderError::InvalidCredentials { .. })),
                "{code} -> {err:?}"
            );
        }
    }

    #[test]
    fn access_denied_is_expected() {
        let Some(err) = classify("AccessDenied", None) else {
            return;
        };
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
        assert!(err.is_expected());
    }

    #[test]
    fn throttling_has_no_retry_hint() {
        assert!(matches!(
            classify("Throttling", Some("example.com")),
            Some(ProviderError::RateLimited {
                retry_after: None,
                ..
            })
        ));
    }

    #[test]
    fn missing_zone_names_queried_domain() {
        let err = classify("NoSuchHostedZone", Some("example.com"));
        assert!(matches!(
            &err,
            Some(ProviderError::ZoneNotFound { domain, .. }) if domain == "example.com"
        ));
    }

    #[test]
    fn bad_domain_name_points_at_dnsname() {
        let err = classify("InvalidDomainName", None);
        assert!(matches!(
            &err,
            Some(ProviderError::InvalidParameter { param, .. }) if param == "dnsname"
        ));
    }

    #[test]
    fn unrecognized_code_is_kept() {
        let err = classify("SomethingNew", None);
        assert!(matches!(
            &err,
            Some(ProviderError::Unknown { raw_code: Some(code), .. }) if code == "SomethingNew"
        ));
        assert_eq!(kind_of("ServiceUnavailable"), Some(FailureKind::ServerSide));
    }
}
