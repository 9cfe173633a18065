//! 域名栈：托管区域查询、DNS 记录与通配符证书

use std::path::PathBuf;

use site_stack_provider::ZoneLookup;

use crate::error::{CoreError, CoreResult};
use crate::resources::{acm, route53};
use crate::services::RecordLoader;
use crate::types::{
    AwsEnvironment, DnsRecordDeclaration, HostedZone, RecordSet, ZoneLookupQuery,
    CERTIFICATE_REGION,
};

use super::{CertificateRef, Stack};

/// Default stack name.
pub const DOMAIN_STACK_ID: &str = "DomainStack";
/// Logical ID of the certificate.
pub const CERTIFICATE_ID: &str = "SiteCertificate";

/// Inputs of a [`DomainStack`].
#[derive(Debug, Clone)]
pub struct DomainStackProps {
    /// Must target `us-east-1`.
    pub env: AwsEnvironment,
    /// Name of an existing hosted zone.
    pub domain_name: String,
    /// Records file; `None` declares the certificate only.
    pub records_file: Option<PathBuf>,
}

impl DomainStackProps {
    pub fn new(env: AwsEnvironment, domain_name: impl Into<String>) -> Self {
        Self {
            env,
            domain_name: domain_name.into(),
            records_file: None,
        }
    }

    #[must_use]
    pub fn with_records_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_file = Some(path.into());
        self
    }
}

/// Zone records and the wildcard certificate of one domain.
#[derive(Debug, Clone)]
pub struct DomainStack {
    stack: Stack,
    hosted_zone: HostedZone,
    certificate: CertificateRef,
    records: Vec<RecordSet>,
}

impl DomainStack {
    /// 构建域名栈
    ///
    /// 检查顺序：区域 → 域名 → 记录文件 → 托管区域查询。任何一步失败都不会
    /// 声明资源。
    pub async fn new(id: &str, props: DomainStackProps, lookup: &dyn ZoneLookup) -> CoreResult<Self> {
        // 证书必须与 CloudFront 同在 us-east-1
        let region = props.env.region.as_deref().unwrap_or("unknown-region");
        if region != CERTIFICATE_REGION {
            return Err(CoreError::WrongRegion {
                stack: id.to_string(),
                required: CERTIFICATE_REGION.to_string(),
                actual: region.to_string(),
            });
        }

        let domain_name = props.domain_name.trim().to_string();
        if domain_name.is_empty() {
            return Err(CoreError::MissingDomainName);
        }

        let declarations: Vec<DnsRecordDeclaration> = match &props.records_file {
            Some(path) => RecordLoader::load_file(path)?,
            None => Vec::new(),
        };

        let mut stack = Stack::new(id, props.env.clone())?;
        stack.set_description(format!("DNS records and certificate for {domain_name}"));

        let query = ZoneLookupQuery::new(domain_name.clone(), props.env.clone());
        let hosted_zone = lookup.lookup_hosted_zone(&query).await?;
        log::info!(
            "[{id}] Using hosted zone {} ({}) via {}",
            hosted_zone.zone_name(),
            hosted_zone.zone_id(),
            lookup.id()
        );

        let records: Vec<RecordSet> = declarations
            .iter()
            .map(|d| RecordSet::from_declaration(d, &domain_name))
            .collect();
        for (index, record) in records.iter().enumerate() {
            stack.add_resource(
                &format!("Record{index}"),
                route53::record_set(&hosted_zone, record),
            )?;
        }

        stack.add_resource(
            CERTIFICATE_ID,
            acm::wildcard_certificate(&domain_name, &hosted_zone),
        )?;

        let certificate = CertificateRef {
            stack_name: id.to_string(),
            logical_id: CERTIFICATE_ID.to_string(),
            env: props.env,
            domain_name,
        };

        log::debug!("[{id}] Declared {} record(s) and certificate", records.len());

        Ok(Self {
            stack,
            hosted_zone,
            certificate,
            records,
        })
    }

    /// The looked-up zone.
    pub fn hosted_zone(&self) -> &HostedZone {
        &self.hosted_zone
    }

    /// Handle to the certificate, for the website stack.
    pub fn certificate(&self) -> &CertificateRef {
        &self.certificate
    }

    /// Declared records, in file order.
    pub fn records(&self) -> &[RecordSet] {
        &self.records
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}
