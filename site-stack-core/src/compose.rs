//! Entry composition of the two stacks

use site_stack_provider::ZoneLookup;

use crate::app::SiteApp;
use crate::config::AppConfig;
use crate::error::CoreResult;
use crate::stacks::{
    DomainStack, DomainStackProps, WebsiteStack, WebsiteStackProps, DOMAIN_STACK_ID,
    WEBSITE_STACK_ID,
};

/// Which stacks a run declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteMode {
    /// Domain stack plus website stack on the custom domain.
    Composed {
        /// Declare the certificate only, without the records file.
        skip_records: bool,
    },
    /// Website stack alone on the default CDN domain.
    Standalone,
}

impl Default for SiteMode {
    fn default() -> Self {
        Self::Composed {
            skip_records: false,
        }
    }
}

/// 按模式声明全部栈
///
/// 组合模式下网站栈部署在域名栈之后。`lookup` 只在组合模式下使用。
pub async fn compose_site(
    config: &AppConfig,
    mode: SiteMode,
    lookup: &dyn ZoneLookup,
) -> CoreResult<SiteApp> {
    let mut app = SiteApp::new();

    match mode {
        SiteMode::Composed { skip_records } => {
            let domain_name = config.require_domain_name()?;

            let mut props = DomainStackProps::new(config.domain_env(), domain_name);
            if !skip_records {
                props = props.with_records_file(&config.records_file);
            }
            let domain = DomainStack::new(DOMAIN_STACK_ID, props, lookup).await?;

            let website = WebsiteStack::new(
                WEBSITE_STACK_ID,
                WebsiteStackProps::with_domain(
                    config.website_env(),
                    domain.hosted_zone().clone(),
                    domain.certificate().clone(),
                )
                .with_asset_dir(&config.asset_dir),
            )?;

            app.add_stack(domain.into_stack())?;
            app.add_stack(website.into_stack())?;
            app.add_dependency(WEBSITE_STACK_ID, DOMAIN_STACK_ID)?;
        }
        SiteMode::Standalone => {
            let website = WebsiteStack::new(
                WEBSITE_STACK_ID,
                WebsiteStackProps::standalone(config.website_env())
                    .with_asset_dir(&config.asset_dir),
            )?;
            app.add_stack(website.into_stack())?;
        }
    }

    Ok(app)
}
