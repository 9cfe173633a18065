//! Site Stack entry point
//!
//! Declares the domain and website stacks and writes the cloud assembly for
//! an external provisioning backend.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, SiteArgs};
use site_stack_core::{compose_site, AppConfig, CoreError, SiteApp, SiteMode};
use site_stack_provider::{
    create_zone_lookup, LookupOptions, ProviderError, StaticZoneLookup, ZoneLookup,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (stdout carries `list` output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if is_expected(&e) {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // `.env` 必须在解析参数前加载，clap 的 env 回退才能读到其中的值
    let config = AppConfig::from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Synth(args) => {
            let (config, app) = declare(config, &args).await?;
            let manifest = app
                .synth(&config.out_dir)
                .with_context(|| format!("failed to synthesize to {}", config.out_dir.display()))?;
            tracing::info!(
                "Wrote {} artifact(s) to {}",
                manifest.artifacts.len(),
                config.out_dir.display()
            );
        }
        Command::List(args) => {
            let (_, app) = declare(config, &args).await?;
            for stack in app.synthesis_order()? {
                let dependencies = app.dependencies_of(stack.name());
                if dependencies.is_empty() {
                    println!("{}", stack.name());
                } else {
                    println!("{} (depends on {})", stack.name(), dependencies.join(", "));
                }
            }
        }
    }
    Ok(())
}

/// Apply flags and declare every stack of the selected mode.
async fn declare(config: AppConfig, args: &SiteArgs) -> anyhow::Result<(AppConfig, SiteApp)> {
    let config = args.apply(config);
    let mode = args.mode();
    tracing::debug!("Mode {mode:?}, config {config:?}");

    let lookup: Arc<dyn ZoneLookup> = match mode {
        // 独立模式不查询托管区域
        SiteMode::Standalone => Arc::new(StaticZoneLookup::new()),
        SiteMode::Composed { .. } => create_zone_lookup(LookupOptions {
            context_file: Some(config.context_file.clone()),
            offline: args.offline,
            ..Default::default()
        })?,
    };

    let app = compose_site(&config, mode, lookup.as_ref()).await?;
    Ok((config, app))
}

/// Whether the failure comes from user input or configuration.
fn is_expected(error: &anyhow::Error) -> bool {
    if let Some(e) = error.downcast_ref::<CoreError>() {
        return e.is_expected();
    }
    error
        .downcast_ref::<ProviderError>()
        .is_some_and(ProviderError::is_expected)
}
