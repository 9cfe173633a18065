//! Shared HTTP transport
//!
//! Backends build and sign their own `RequestBuilder`; this module sends it
//! once, classifies transport-level failures and decodes XML bodies.
//! Nothing here retries: a failed lookup aborts the synthesis run.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a client with the connect/request timeouts used by every backend.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| network_error(provider, format!("cannot build HTTP client: {e}")))
}

/// A response that passed transport checks.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send `request` once.
///
/// Throttling (429) and gateway failures (502-504) become errors here; every
/// other status is handed back for the backend to interpret.
pub async fn send(request: RequestBuilder, provider: &str, label: &str) -> Result<RawResponse> {
    log::debug!("[{provider}] -> {label}");

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        } else {
            network_error(provider, e.to_string())
        }
    })?;

    let status = response.status().as_u16();
    log::debug!("[{provider}] <- HTTP {status}");

    match status {
        429 => {
            let retry_after = retry_after_secs(&response);
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider}] Throttled (HTTP 429), retry_after={retry_after:?}");
            Err(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after,
                raw_message: Some(body),
            })
        }
        502..=504 => {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider}] Gateway failure (HTTP {status})");
            Err(network_error(
                provider,
                format!("HTTP {status}: {}", truncate_for_log(&body)),
            ))
        }
        _ => {
            let body = response
                .text()
                .await
                .map_err(|e| network_error(provider, format!("cannot read response body: {e}")))?;
            log::debug!("[{provider}] Body: {}", truncate_for_log(&body));
            Ok(RawResponse { status, body })
        }
    }
}

/// Decode an XML document, logging the offending body on failure.
pub fn decode_xml<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
    quick_xml::de::from_str(body).map_err(|e| {
        log::error!(
            "[{provider}] Unexpected XML ({e}): {}",
            truncate_for_log(body)
        );
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn network_error(provider: &str, detail: String) -> ProviderError {
    ProviderError::NetworkError {
        provider: provider.to_string(),
        detail,
    }
}
