//! Shared helpers for the lookup integration tests

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use site_stack_provider::{
    AwsEnvironment, LookupOptions, ZoneLookup, ZoneLookupQuery, create_zone_lookup,
};

/// 任一变量未设置时打印原因并结束当前测试
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+ $(,)?) => {
        let missing: Vec<&str> = [$($var),+]
            .into_iter()
            .filter(|name| std::env::var(name).is_err())
            .collect();
        if !missing.is_empty() {
            eprintln!("skipped, unset: {}", missing.join(", "));
            return;
        }
    };
}

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

/// Live Route53 lookup plus the zone it is expected to find.
pub struct TestContext {
    pub lookup: Arc<dyn ZoneLookup>,
    pub domain: String,
    pub env: AwsEnvironment,
}

impl TestContext {
    /// 凭证取自 `AWS_*` 变量，区域名取自 `TEST_DOMAIN`
    pub fn route53() -> Option<Self> {
        let lookup = create_zone_lookup(LookupOptions::default()).ok()?;
        let env = AwsEnvironment::new(
            env::var("CDK_DEFAULT_ACCOUNT").ok(),
            Some("us-east-1".to_string()),
        );
        env::var("TEST_DOMAIN").ok().map(|domain| Self {
            lookup,
            domain,
            env,
        })
    }

    pub fn query(&self) -> ZoneLookupQuery {
        ZoneLookupQuery::new(self.domain.clone(), self.env.clone())
    }
}
