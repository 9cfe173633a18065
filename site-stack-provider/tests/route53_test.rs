//! Route53 zone lookup 集成测试
//!
//! 运行方式:
//! ```bash
//! AWS_ACCESS_KEY_ID=xxx AWS_SECRET_ACCESS_KEY=xxx TEST_DOMAIN=example.com \
//!     cargo test -p site-stack-provider --test route53_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::TestContext;
use site_stack_provider::{ProviderError, ZoneLookupQuery};

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and TEST_DOMAIN"]
async fn test_route53_lookup_existing_zone() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::route53(), "创建测试上下文失败");
    let zone = require_ok!(
        ctx.lookup.lookup_hosted_zone(&ctx.query()).await,
        "lookup_hosted_zone 调用失败"
    );

    assert_eq!(zone.zone_name(), ctx.domain.trim_end_matches('.'), "区域名称不匹配");
    assert!(zone.id.starts_with("/hostedzone/"), "区域 ID 格式不正确: {}", zone.id);

    println!("✓ lookup_hosted_zone 测试通过: {} ({})", zone.name, zone.zone_id());
}

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and TEST_DOMAIN"]
async fn test_route53_lookup_missing_zone() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::route53(), "创建测试上下文失败");
    let query = ZoneLookupQuery::new("zone-that-does-not-exist.invalid", ctx.env.clone());
    let result = ctx.lookup.lookup_hosted_zone(&query).await;

    assert!(
        matches!(
            result,
            Err(ProviderError::ZoneNotFound { .. } | ProviderError::InvalidParameter { .. })
        ),
        "不存在的区域应返回 ZoneNotFound: {result:?}"
    );

    println!("✓ 不存在区域测试通过");
}
