//! Run configuration
//!
//! Values come from the process environment (after `.env` is loaded) and are
//! then overridden by command-line flags.

use std::path::PathBuf;

use site_stack_provider::DEFAULT_CONTEXT_FILE;

use crate::error::{CoreError, CoreResult};
use crate::services::{DEFAULT_ASSET_DIR, DEFAULT_RECORDS_FILE};
use crate::types::{AwsEnvironment, CERTIFICATE_REGION};

/// Domain name of the site.
pub const DOMAIN_NAME_VAR: &str = "DOMAIN_NAME";
/// Default target account.
pub const ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";
/// Default target region.
pub const REGION_VAR: &str = "CDK_DEFAULT_REGION";

/// Default output directory of the assembly.
pub const DEFAULT_OUT_DIR: &str = "cdk.out";

/// Settings of one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Required in composed mode.
    pub domain_name: Option<String>,
    pub account: Option<String>,
    /// Region of the website stack.
    pub region: Option<String>,
    pub records_file: PathBuf,
    pub asset_dir: PathBuf,
    pub context_file: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            domain_name: None,
            account: None,
            region: None,
            records_file: PathBuf::from(DEFAULT_RECORDS_FILE),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            context_file: PathBuf::from(DEFAULT_CONTEXT_FILE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl AppConfig {
    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_source<F>(source: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            source(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            domain_name: read(DOMAIN_NAME_VAR),
            account: read(ACCOUNT_VAR),
            region: read(REGION_VAR),
            ..Self::default()
        }
    }

    /// 加载 `.env`（不存在时忽略）后读取进程环境变量
    pub fn from_env() -> CoreResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(CoreError::ConfigRead {
                    path: ".env".to_string(),
                    detail: e.to_string(),
                });
            }
        }
        Ok(Self::from_source(|key| std::env::var(key).ok()))
    }

    /// Domain name, or [`CoreError::MissingDomainName`].
    pub fn require_domain_name(&self) -> CoreResult<&str> {
        self.domain_name
            .as_deref()
            .ok_or(CoreError::MissingDomainName)
    }

    /// Environment of the domain stack, pinned to the certificate region.
    pub fn domain_env(&self) -> AwsEnvironment {
        AwsEnvironment::new(self.account.clone(), Some(CERTIFICATE_REGION.to_string()))
    }

    /// Environment of the website stack.
    pub fn website_env(&self) -> AwsEnvironment {
        AwsEnvironment::new(self.account.clone(), self.region.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_variables_and_defaults() {
        let config = AppConfig::from_source(source(&[
            (DOMAIN_NAME_VAR, "example.com"),
            (ACCOUNT_VAR, "111111111111"),
            (REGION_VAR, "eu-west-1"),
        ]));
        assert_eq!(config.require_domain_name().ok(), Some("example.com"));
        assert_eq!(config.records_file, PathBuf::from("configuration/dns-records.json"));
        assert_eq!(config.asset_dir, PathBuf::from("website"));
        assert_eq!(config.out_dir, PathBuf::from("cdk.out"));

        assert_eq!(config.domain_env().region.as_deref(), Some("us-east-1"));
        assert_eq!(config.domain_env().account.as_deref(), Some("111111111111"));
        assert_eq!(config.website_env().region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn blank_domain_is_missing() {
        let config = AppConfig::from_source(source(&[(DOMAIN_NAME_VAR, "   ")]));
        assert!(matches!(
            config.require_domain_name(),
            Err(CoreError::MissingDomainName)
        ));
    }

    #[test]
    fn domain_env_ignores_default_region() {
        let config = AppConfig::from_source(source(&[(REGION_VAR, "ap-southeast-2")]));
        assert_eq!(config.domain_env().region.as_deref(), Some(CERTIFICATE_REGION));
        assert_eq!(config.website_env().account, None);
    }
}
