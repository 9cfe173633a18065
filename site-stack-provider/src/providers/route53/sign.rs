//! AWS Signature Version 4
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>

use std::fmt::Write;

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::utils::log_sanitizer::{redact_security_token, truncate_for_log};

use super::{ROUTE53_SERVICE, ROUTE53_SIGNING_REGION, Route53Lookup};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Key material and scope of a single signature.
pub(crate) struct SigningParams<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    /// `YYYYMMDDTHHMMSSZ`
    pub amz_date: &'a str,
}

impl SigningParams<'_> {
    fn date(&self) -> &str {
        self.amz_date.get(..8).unwrap_or(self.amz_date)
    }

    fn scope(&self) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            self.date(),
            self.region,
            self.service
        )
    }
}

/// kSecret → kDate → kRegion → kService → kSigning
pub(crate) fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Query parameters URI-encoded and sorted by name, then value.
pub(crate) fn canonical_query(query: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Computes the `Authorization` header value for a request.
pub(crate) fn authorization_header(
    params: &SigningParams<'_>,
    method: &str,
    uri: &str,
    query: &[(&str, &str)],
    headers: &[(String, String)],
    payload: &str,
) -> String {
    // 1. 规范化请求头（小写、去除首尾空白、按名称排序）
    let mut sorted_headers: Vec<(String, String)> = headers
        .iter()
        .map(|(k, v)| {
            (
                k.to_lowercase(),
                v.split_whitespace().collect::<Vec<_>>().join(" "),
            )
        })
        .collect();
    sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers = sorted_headers
        .iter()
        .fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{v}");
            acc
        });

    let signed_headers = sorted_headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    // 2. 规范请求
    let canonical_request = format!(
        "{method}\n{uri}\n{}\n{canonical_headers}\n{signed_headers}\n{}",
        canonical_query(query),
        sha256_hex(payload.as_bytes())
    );

    log::debug!(
        "CanonicalRequest:\n{}",
        truncate_for_log(&redact_security_token(&canonical_request))
    );

    // 3. 待签名字符串
    let scope = params.scope();
    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{scope}\n{}",
        params.amz_date,
        sha256_hex(canonical_request.as_bytes())
    );

    log::debug!("StringToSign:\n{string_to_sign}");

    // 4. 签名
    let signing_key = derive_signing_key(
        params.secret_access_key,
        params.date(),
        params.region,
        params.service,
    );
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        params.access_key_id
    )
}

impl Route53Lookup {
    /// Sign a Route53 request with the configured credentials.
    pub(crate) fn sign(
        &self,
        method: &str,
        uri: &str,
        query: &[(&str, &str)],
        headers: &[(String, String)],
        amz_date: &str,
    ) -> String {
        let params = SigningParams {
            access_key_id: &self.credentials.access_key_id,
            secret_access_key: &self.credentials.secret_access_key,
            region: ROUTE53_SIGNING_REGION,
            service: ROUTE53_SERVICE,
            amz_date,
        };
        authorization_header(&params, method, uri, query, headers, "")
    }
}
