//! 网站栈：私有存储桶、CDN 分发、别名记录与静态资源部署

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::resources::cloudfront::{self, DistributionSettings, ErrorResponse, PriceClass};
use crate::resources::{custom, route53, s3};
use crate::services::{AssetService, FileAsset, DEFAULT_ASSET_DIR};
use crate::types::{fn_get_att, fn_ref, AwsEnvironment, HostedZone, Output, CERTIFICATE_REGION};

use super::{import_certificate_arn, CertificateRef, Stack};

/// Default stack name.
pub const WEBSITE_STACK_ID: &str = "WebsiteStack";

pub const BUCKET_ID: &str = "Bucket";
const BUCKET_POLICY_ID: &str = "BucketPolicy";
const AUTO_DELETE_ID: &str = "BucketAutoDeleteObjectsCustomResource";
const ORIGIN_ACCESS_CONTROL_ID: &str = "CloudFrontDistributionOriginAccessControl";
pub const DISTRIBUTION_ID: &str = "CloudFrontDistribution";
pub const APEX_RECORD_ID: &str = "ApexRecord";
pub const WWW_RECORD_ID: &str = "WWWRecord";
pub const DEPLOYMENT_ID: &str = "DeployWebsite";

const DISTRIBUTION_COMMENT: &str = "Personal website";
const DEFAULT_ROOT_OBJECT: &str = "index.html";
const ERROR_PAGE: &str = "/error.html";
const INVALIDATION_PATHS: [&str; 1] = ["/*"];

/// Inputs of a [`WebsiteStack`].
///
/// `hosted_zone` and `certificate` are given together (custom domain) or
/// both omitted (standalone, default CloudFront domain only).
#[derive(Debug, Clone)]
pub struct WebsiteStackProps {
    pub env: AwsEnvironment,
    pub hosted_zone: Option<HostedZone>,
    pub certificate: Option<CertificateRef>,
    /// Static site directory uploaded to the bucket.
    pub asset_dir: PathBuf,
}

impl WebsiteStackProps {
    /// Website on the default CloudFront domain.
    pub fn standalone(env: AwsEnvironment) -> Self {
        Self {
            env,
            hosted_zone: None,
            certificate: None,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
        }
    }

    /// Website served from the zone apex and `www`.
    pub fn with_domain(env: AwsEnvironment, hosted_zone: HostedZone, certificate: CertificateRef) -> Self {
        Self {
            env,
            hosted_zone: Some(hosted_zone),
            certificate: Some(certificate),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
        }
    }

    #[must_use]
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }
}

/// Storage, CDN, DNS aliases and asset deployment of the site.
#[derive(Debug, Clone)]
pub struct WebsiteStack {
    stack: Stack,
    domain_names: Vec<String>,
    asset: FileAsset,
}

impl WebsiteStack {
    pub fn new(id: &str, props: WebsiteStackProps) -> CoreResult<Self> {
        let custom_domain = match (props.hosted_zone, props.certificate) {
            (Some(zone), Some(certificate)) => Some((zone, certificate)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(CoreError::ValidationError(format!(
                    "{id}: a hosted zone requires a certificate"
                )));
            }
            (None, Some(_)) => {
                return Err(CoreError::ValidationError(format!(
                    "{id}: a certificate requires a hosted zone"
                )));
            }
        };

        if let Some((zone, certificate)) = &custom_domain {
            if let Some(region) = certificate.env.region.as_deref() {
                if region != CERTIFICATE_REGION {
                    return Err(CoreError::ValidationError(format!(
                        "{id}: distribution certificates must be in {CERTIFICATE_REGION}, {} is in {region}",
                        certificate.stack_name
                    )));
                }
            }
            if !zone.zone_name().eq_ignore_ascii_case(&certificate.domain_name) {
                log::warn!(
                    "[{id}] Certificate for {} does not match zone {}",
                    certificate.domain_name,
                    zone.zone_name()
                );
            }
        }

        let asset = AssetService::stage_directory(&props.asset_dir)?;

        let mut stack = Stack::new(id, props.env)?;
        stack.set_description("Static website bucket, distribution and deployment");

        // 存储桶：禁止公开访问，随栈删除并清空对象
        stack.add_resource(BUCKET_ID, s3::private_bucket(true))?;
        stack.add_resource(
            BUCKET_POLICY_ID,
            s3::bucket_policy(
                BUCKET_ID,
                vec![
                    s3::auto_delete_statement(BUCKET_ID),
                    s3::distribution_read_statement(BUCKET_ID, DISTRIBUTION_ID),
                ],
            ),
        )?;
        stack.add_resource(
            AUTO_DELETE_ID,
            custom::auto_delete_objects(BUCKET_ID, BUCKET_POLICY_ID),
        )?;

        let oac_name = format!("{id}{ORIGIN_ACCESS_CONTROL_ID}");
        stack.add_resource(
            ORIGIN_ACCESS_CONTROL_ID,
            cloudfront::origin_access_control(&oac_name),
        )?;

        let (domain_names, certificate_arn) = match &custom_domain {
            Some((zone, certificate)) => {
                let apex = zone.zone_name().to_string();
                let names = vec![apex.clone(), format!("www.{apex}")];
                let arn = import_certificate_arn(&mut stack, certificate)?;
                (names, Some(arn))
            }
            None => (Vec::new(), None),
        };

        let settings = DistributionSettings {
            comment: DISTRIBUTION_COMMENT.to_string(),
            default_root_object: DEFAULT_ROOT_OBJECT.to_string(),
            price_class: PriceClass::PriceClass100,
            error_responses: vec![
                ErrorResponse::new(404, 404, ERROR_PAGE),
                ErrorResponse::new(403, 404, ERROR_PAGE),
            ],
            aliases: domain_names.clone(),
            certificate_arn,
        };
        stack.add_resource(
            DISTRIBUTION_ID,
            cloudfront::s3_distribution(BUCKET_ID, ORIGIN_ACCESS_CONTROL_ID, &settings),
        )?;

        if let Some((zone, _)) = &custom_domain {
            stack.add_resource(
                APEX_RECORD_ID,
                route53::distribution_alias(zone, None, DISTRIBUTION_ID),
            )?;
            stack.add_resource(
                WWW_RECORD_ID,
                route53::distribution_alias(zone, Some("www"), DISTRIBUTION_ID),
            )?;
        } else {
            log::info!("[{id}] No hosted zone given; serving from the default CloudFront domain");
        }

        stack.add_resource(
            DEPLOYMENT_ID,
            custom::bucket_deployment(&asset, BUCKET_ID, Some(DISTRIBUTION_ID), &INVALIDATION_PATHS),
        )?;
        stack.add_asset(asset.clone());

        stack.template_mut().add_output(
            "DistributionDomainName",
            Output {
                value: fn_get_att(DISTRIBUTION_ID, "DomainName"),
                description: Some("Default CloudFront domain of the site".to_string()),
                export: None,
            },
        )?;
        stack.template_mut().add_output(
            "BucketName",
            Output {
                value: fn_ref(BUCKET_ID),
                description: None,
                export: None,
            },
        )?;

        Ok(Self {
            stack,
            domain_names,
            asset,
        })
    }

    /// Custom domain names bound to the distribution (empty when standalone).
    pub fn domain_names(&self) -> &[String] {
        &self.domain_names
    }

    /// The fingerprinted asset directory.
    pub fn asset(&self) -> &FileAsset {
        &self.asset
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::{certificate_ref, hosted_zone, write_site};

    fn env(region: &str) -> AwsEnvironment {
        AwsEnvironment::new(Some("111111111111".into()), Some(region.into()))
    }

    #[test]
    fn composed_site_binds_domains_and_aliases() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        write_site(dir.path());
        let props = WebsiteStackProps::with_domain(env("eu-west-1"), hosted_zone(), certificate_ref())
            .with_asset_dir(dir.path());

        let website = WebsiteStack::new(WEBSITE_STACK_ID, props);
        assert!(website.is_ok(), "{website:?}");
        let Ok(website) = website else {
            return;
        };

        assert_eq!(website.domain_names(), ["example.com", "www.example.com"]);
        let template = website.stack().template();
        let config = &template.resources[DISTRIBUTION_ID].properties["DistributionConfig"];
        assert_eq!(config["Aliases"], json!(["example.com", "www.example.com"]));
        assert_eq!(config["Comment"], "Personal website");
        assert_eq!(config["DefaultRootObject"], "index.html");
        assert_eq!(
            config["ViewerCertificate"]["AcmCertificateArn"]["Fn::GetAtt"][0],
            "ExportsReader"
        );

        assert_eq!(template.resources[APEX_RECORD_ID].properties["Name"], "example.com.");
        assert_eq!(template.resources[WWW_RECORD_ID].properties["Name"], "www.example.com.");
        assert_eq!(template.resources[WWW_RECORD_ID].properties["Type"], "A");
        assert_eq!(
            template.resources[DEPLOYMENT_ID].properties["DistributionPaths"],
            json!(["/*"])
        );
        assert_eq!(website.stack().referenced_stacks(), vec!["DomainStack"]);
        assert_eq!(website.stack().assets().len(), 1);
    }

    #[test]
    fn standalone_site_has_no_aliases() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        write_site(dir.path());
        let props = WebsiteStackProps::standalone(env("eu-west-1")).with_asset_dir(dir.path());

        let website = WebsiteStack::new(WEBSITE_STACK_ID, props);
        assert!(website.is_ok(), "{website:?}");
        let Ok(website) = website else {
            return;
        };

        let template = website.stack().template();
        assert!(website.domain_names().is_empty());
        assert!(template.resource(APEX_RECORD_ID).is_none());
        assert!(template.resource(WWW_RECORD_ID).is_none());
        assert_eq!(template.resources_of_type(route53::RECORD_SET_TYPE).count(), 0);
        let config = &template.resources[DISTRIBUTION_ID].properties["DistributionConfig"];
        assert!(config.get("Aliases").is_none());
        assert!(config.get("ViewerCertificate").is_none());
        assert!(website.stack().imports().is_empty());
    }

    #[test]
    fn zone_without_certificate_is_rejected() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        write_site(dir.path());
        let mut props = WebsiteStackProps::standalone(env("us-east-1")).with_asset_dir(dir.path());
        props.hosted_zone = Some(hosted_zone());
        assert!(matches!(
            WebsiteStack::new(WEBSITE_STACK_ID, props),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_asset_directory_is_rejected() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let props = WebsiteStackProps::standalone(env("us-east-1")).with_asset_dir(dir.path().join("site"));
        assert!(matches!(
            WebsiteStack::new(WEBSITE_STACK_ID, props),
            Err(CoreError::AssetError(_))
        ));
    }

    #[test]
    fn bucket_is_private_and_read_only_to_distribution() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        write_site(dir.path());
        let props = WebsiteStackProps::standalone(env("us-east-1")).with_asset_dir(dir.path());
        let Ok(website) = WebsiteStack::new(WEBSITE_STACK_ID, props) else {
            return;
        };
        let template = website.stack().template();
        let statements = &template.resources["BucketPolicy"].properties["PolicyDocument"]["Statement"];
        assert_eq!(statements[1]["Principal"]["Service"], "cloudfront.amazonaws.com");
        assert_eq!(
            template.resources[BUCKET_ID].properties["PublicAccessBlockConfiguration"]["BlockPublicPolicy"],
            true
        );
    }
}
