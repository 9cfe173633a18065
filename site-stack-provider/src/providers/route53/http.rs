//! Route53 HTTP 请求方法

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{self, RawResponse};
use crate::traits::{ApiFailure, ClassifyFailure};

use super::Route53Lookup;
use super::types::ErrorResponse;

/// SigV4 要求的时间戳格式
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

impl Route53Lookup {
    /// Turn a non-2xx response into a classified error.
    fn failure_of(&self, response: &RawResponse, domain: Option<&str>) -> ProviderError {
        let failure = match quick_xml::de::from_str::<ErrorResponse>(&response.body) {
            Ok(parsed) => ApiFailure {
                code: parsed.error.code,
                message: parsed.error.message.unwrap_or_default(),
                domain: None,
            },
            // 非结构化响应体，保留状态码和原文
            Err(_) => {
                return self.unclassified(ApiFailure::uncoded(format!(
                    "HTTP {}: {}",
                    response.status, response.body
                )));
            }
        };
        self.classify(failure.during_lookup_of(domain))
    }

    /// 签名 GET 请求并解码 XML 响应体
    ///
    /// `domain` 是本次查询的域名，用于填充 `ZoneNotFound`。
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        domain: Option<&str>,
    ) -> Result<T> {
        let amz_date = Utc::now().format(AMZ_DATE_FORMAT).to_string();
        let token = self.credentials.session_token.as_deref();

        let mut signed_headers = vec![
            ("Host".to_string(), self.host().to_string()),
            ("X-Amz-Date".to_string(), amz_date.clone()),
        ];
        signed_headers.extend(token.map(|t| ("X-Amz-Security-Token".to_string(), t.to_string())));
        let authorization = self.sign("GET", path, query, &signed_headers, &amz_date);

        let url = match super::sign::canonical_query(query) {
            qs if qs.is_empty() => format!("{}{path}", self.endpoint),
            qs => format!("{}{path}?{qs}", self.endpoint),
        };

        let mut request = self.client.get(&url);
        for (name, value) in signed_headers.iter().filter(|(name, _)| name != "Host") {
            request = request.header(name.as_str(), value.as_str());
        }
        request = request.header("Authorization", authorization);

        let response = http_client::send(request, self.backend(), &format!("GET {url}")).await?;
        if !response.is_success() {
            return Err(self.failure_of(&response, domain));
        }
        http_client::decode_xml(&response.body, self.backend())
    }
}
