//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use site_stack_core::config::{ACCOUNT_VAR, DOMAIN_NAME_VAR, REGION_VAR};
use site_stack_core::{AppConfig, SiteMode};

#[derive(Debug, Parser)]
#[command(name = "site-stack", version, about = "Synthesize the static site stacks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the cloud assembly
    Synth(SiteArgs),
    /// Print stack names and their dependencies
    List(SiteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SiteArgs {
    /// Website stack only, on the default CDN domain
    #[arg(long)]
    pub standalone: bool,

    /// Declare the certificate without the DNS records file
    #[arg(long, conflicts_with = "standalone")]
    pub skip_records: bool,

    /// Output directory of the assembly
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// DNS records file
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Static site directory
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Context file caching zone lookups
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Resolve zones from the context file only
    #[arg(long)]
    pub offline: bool,

    /// Domain name (hosted zone) of the site
    #[arg(long, value_name = "NAME", env = DOMAIN_NAME_VAR)]
    pub domain: Option<String>,

    /// Target account
    #[arg(long, value_name = "ID", env = ACCOUNT_VAR)]
    pub account: Option<String>,

    /// Region of the website stack
    #[arg(long, value_name = "REGION", env = REGION_VAR)]
    pub region: Option<String>,
}

impl SiteArgs {
    pub fn mode(&self) -> SiteMode {
        if self.standalone {
            SiteMode::Standalone
        } else {
            SiteMode::Composed {
                skip_records: self.skip_records,
            }
        }
    }

    /// Flags take precedence over the environment.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        if let Some(domain) = non_blank(&self.domain) {
            config.domain_name = Some(domain);
        }
        if let Some(account) = non_blank(&self.account) {
            config.account = Some(account);
        }
        if let Some(region) = non_blank(&self.region) {
            config.region = Some(region);
        }
        if let Some(out) = &self.out {
            config.out_dir.clone_from(out);
        }
        if let Some(records) = &self.records {
            config.records_file.clone_from(records);
        }
        if let Some(assets) = &self.assets {
            config.asset_dir.clone_from(assets);
        }
        if let Some(context) = &self.context {
            config.context_file.clone_from(context);
        }
        config
    }
}
