//! 测试辅助模块
//!
//! 提供 mock 查询实现和常用的测试夹具。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use site_stack_provider::{Result as ProviderResult, StaticZoneLookup, ZoneLookup};

use crate::stacks::{CertificateRef, CERTIFICATE_ID, DOMAIN_STACK_ID};
use crate::types::{AwsEnvironment, HostedZone, ZoneLookupQuery};

// ===== Fixtures =====

pub fn us_east_1() -> AwsEnvironment {
    AwsEnvironment::new(Some("111111111111".into()), Some("us-east-1".into()))
}

pub fn hosted_zone() -> HostedZone {
    HostedZone::new("/hostedzone/Z0EXAMPLE", "example.com.")
}

/// Certificate declared by a domain stack in `us-east-1`.
pub fn certificate_ref() -> CertificateRef {
    CertificateRef {
        stack_name: DOMAIN_STACK_ID.to_string(),
        logical_id: CERTIFICATE_ID.to_string(),
        env: us_east_1(),
        domain_name: "example.com".to_string(),
    }
}

pub fn static_lookup() -> StaticZoneLookup {
    StaticZoneLookup::new().with_zone(hosted_zone())
}

/// TXT + MX at the apex.
pub fn sample_records_json() -> String {
    r#"{
  "records": [
    {"type": "TXT", "name": "example.com", "values": ["\"v=spf1 include:_spf.example.net ~all\""]},
    {"type": "MX", "name": "example.com", "values": ["10 mx1.example.net", "20 mx2.example.net"]}
  ]
}"#
    .to_string()
}

pub fn write_records_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("dns-records.json");
    let written = fs::write(&path, content);
    assert!(written.is_ok(), "{written:?}");
    path
}

/// `index.html`, `error.html` and `css/site.css`.
pub fn write_site(dir: &Path) {
    let files = [
        ("index.html", "<h1>Hello</h1>"),
        ("error.html", "<h1>Not found</h1>"),
        ("css/site.css", "body { margin: 0; }"),
    ];
    for (relative, content) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            assert!(fs::create_dir_all(parent).is_ok());
        }
        assert!(fs::write(&path, content).is_ok(), "{relative}");
    }
}

// ===== CountingLookup =====

/// Delegating lookup that counts calls.
pub struct CountingLookup<L> {
    inner: L,
    calls: AtomicUsize,
}

impl<L: ZoneLookup> CountingLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<L: ZoneLookup> ZoneLookup for CountingLookup<L> {
    fn id(&self) -> &'static str {
        "counting"
    }

    async fn lookup_hosted_zone(&self, query: &ZoneLookupQuery) -> ProviderResult<HostedZone> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_hosted_zone(query).await
    }
}
