//! Route53 hosted zone lookup

mod error;
mod http;
mod provider;
mod sign;
/// Route53 API-specific response types.
pub(crate) mod types;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::http_client::create_http_client;

/// Route53 global API endpoint.
pub(crate) const ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";
/// Route53 is a global service signed against `us-east-1`.
pub(crate) const ROUTE53_SIGNING_REGION: &str = "us-east-1";
/// SigV4 service name.
pub(crate) const ROUTE53_SERVICE: &str = "route53";
/// API version path prefix.
pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";

/// Environment variable holding the access key ID.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the optional session token.
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// AWS credentials used to sign Route53 requests.
#[derive(Clone)]
pub struct Route53Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Route53Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Credentials")
            .field(
                "access_key_id",
                &crate::utils::log_sanitizer::mask_secret(&self.access_key_id),
            )
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .finish()
    }
}

impl Route53Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials).
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read credentials through a variable source.
    ///
    /// Empty values count as missing.
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let access_key_id = read(ACCESS_KEY_ID_VAR).ok_or_else(|| missing(ACCESS_KEY_ID_VAR))?;
        let secret_access_key =
            read(SECRET_ACCESS_KEY_VAR).ok_or_else(|| missing(SECRET_ACCESS_KEY_VAR))?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: read(SESSION_TOKEN_VAR),
        })
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|name| std::env::var(name).ok())
    }
}

fn missing(variable: &str) -> ProviderError {
    ProviderError::MissingCredentials {
        provider: ROUTE53_SERVICE.to_string(),
        variable: variable.to_string(),
    }
}

/// Route53 zone lookup implementation.
///
/// Resolves hosted zones through `ListHostedZonesByName`, signed with AWS
/// Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use site_stack_provider::{Route53Credentials, Route53Lookup};
///
/// let lookup = Route53Lookup::new(Route53Credentials::new(
///     "your-access-key-id",
///     "your-secret-access-key",
/// ))
/// .unwrap();
/// ```
pub struct Route53Lookup {
    pub(crate) client: Client,
    pub(crate) credentials: Route53Credentials,
    pub(crate) endpoint: String,
}

/// Builder for [`Route53Lookup`].
pub struct Route53LookupBuilder {
    credentials: Route53Credentials,
    endpoint: String,
}

impl Route53LookupBuilder {
    fn new(credentials: Route53Credentials) -> Self {
        Self {
            credentials,
            endpoint: ROUTE53_ENDPOINT.to_string(),
        }
    }

    /// Override the API endpoint (default: `https://route53.amazonaws.com`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the [`Route53Lookup`] instance.
    pub fn build(self) -> Result<Route53Lookup> {
        Ok(Route53Lookup {
            client: create_http_client(ROUTE53_SERVICE)?,
            credentials: self.credentials,
            endpoint: self.endpoint,
        })
    }
}

impl Route53Lookup {
    /// Creates a lookup against the public Route53 endpoint.
    pub fn new(credentials: Route53Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the lookup configuration.
    pub fn builder(credentials: Route53Credentials) -> Route53LookupBuilder {
        Route53LookupBuilder::new(credentials)
    }

    /// Host part of the configured endpoint (used in the signed `host` header).
    pub(crate) fn host(&self) -> &str {
        let without_scheme = self
            .endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, rest)| rest);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}
