//! Fixtures for assembly integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use site_stack_core::site_stack_provider::{HostedZone, StaticZoneLookup};
use site_stack_core::AppConfig;

/// 取出 `Ok` 中的值；`Err` 时测试失败并返回
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(, $ctx:literal)? $(,)?) => {{
        let outcome = $expr;
        assert!(outcome.is_ok(), concat!("expected Ok" $(, " (", $ctx, ")")?, ": {:?}"), outcome);
        match outcome {
            Ok(value) => value,
            Err(_) => return,
        }
    }};
}

/// 取出 `Some` 中的值；`None` 时测试失败并返回
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(, $ctx:literal)? $(,)?) => {{
        let found = $expr;
        assert!(found.is_some(), concat!("expected Some" $(, " (", $ctx, ")")?));
        match found {
            Some(value) => value,
            None => return,
        }
    }};
}

/// 项目目录夹具：记录文件 + 静态站点
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Option<Self> {
        let dir = tempfile::tempdir().ok()?;
        let root = dir.path();

        fs::create_dir_all(root.join("configuration")).ok()?;
        fs::write(
            root.join("configuration/dns-records.json"),
            r#"{"records": [
                {"type": "TXT", "name": "example.com", "values": ["\"v=spf1 -all\""]},
                {"type": "MX", "name": "example.com", "values": ["10 mx.example.net"]},
                {"type": "CNAME", "name": "blog", "values": ["example.github.io"]}
            ]}"#,
        )
        .ok()?;

        fs::create_dir_all(root.join("website")).ok()?;
        fs::write(root.join("website/index.html"), "<h1>Home</h1>").ok()?;
        fs::write(root.join("website/error.html"), "<h1>Oops</h1>").ok()?;

        Some(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root().join("cdk.out")
    }

    /// Configuration rooted in this workspace.
    pub fn config(&self, domain: Option<&str>, region: &str) -> AppConfig {
        AppConfig {
            domain_name: domain.map(str::to_string),
            account: Some("111111111111".to_string()),
            region: Some(region.to_string()),
            records_file: self.root().join("configuration/dns-records.json"),
            asset_dir: self.root().join("website"),
            context_file: self.root().join("cdk.context.json"),
            out_dir: self.out_dir(),
        }
    }
}

pub fn lookup() -> StaticZoneLookup {
    StaticZoneLookup::new().with_zone(HostedZone::new("/hostedzone/Z0EXAMPLE", "example.com."))
}

/// Read a JSON file written by the synthesizer.
pub fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
