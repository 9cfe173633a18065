//! Stack declarations
//!
//! A [`Stack`] is one deployable unit: a target environment, a template and
//! the local assets the template refers to. [`DomainStack`] and
//! [`WebsiteStack`] build their stacks once at construction; afterwards the
//! handles they expose are read-only.

mod domain_stack;
mod references;
mod website_stack;

pub use domain_stack::{DomainStack, DomainStackProps, CERTIFICATE_ID, DOMAIN_STACK_ID};
pub use references::{
    apply_export, import_certificate_arn, CertificateRef, CrossStackImport, ExportMechanism,
    CROSS_REGION_READER_ID, EXPORT_PARAMETER_PREFIX,
};
pub use website_stack::{
    WebsiteStack, WebsiteStackProps, APEX_RECORD_ID, BUCKET_ID, DEPLOYMENT_ID, DISTRIBUTION_ID,
    WEBSITE_STACK_ID, WWW_RECORD_ID,
};

use crate::error::{CoreError, CoreResult};
use crate::services::FileAsset;
use crate::types::{AwsEnvironment, Resource, Template};

/// One deployable unit of the assembly.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: AwsEnvironment,
    template: Template,
    assets: Vec<FileAsset>,
    imports: Vec<CrossStackImport>,
}

impl Stack {
    /// Stack names start with a letter and contain only `[A-Za-z0-9-]`.
    pub fn new(name: &str, env: AwsEnvironment) -> CoreResult<Self> {
        let valid = name.len() <= 128
            && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(CoreError::ValidationError(format!(
                "invalid stack name {name:?}: must start with a letter and contain only [A-Za-z0-9-]"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            env,
            template: Template::new(),
            assets: Vec::new(),
            imports: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &AwsEnvironment {
        &self.env
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub(crate) fn template_mut(&mut self) -> &mut Template {
        &mut self.template
    }

    /// Local assets referenced by the template.
    pub fn assets(&self) -> &[FileAsset] {
        &self.assets
    }

    /// Values this stack consumes from other stacks.
    pub fn imports(&self) -> &[CrossStackImport] {
        &self.imports
    }

    /// Stacks this stack reads values from (deduplicated, in first-use order).
    pub fn referenced_stacks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for import in &self.imports {
            if !names.contains(&import.producer.as_str()) {
                names.push(&import.producer);
            }
        }
        names
    }

    pub(crate) fn add_resource(&mut self, logical_id: &str, resource: Resource) -> CoreResult<()> {
        self.template.add_resource(logical_id, resource)
    }

    pub(crate) fn add_asset(&mut self, asset: FileAsset) {
        if !self.assets.iter().any(|a| a.hash == asset.hash) {
            self.assets.push(asset);
        }
    }

    pub(crate) fn add_import(&mut self, import: CrossStackImport) {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    /// Set the template description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.template.description = Some(description.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_name_rules() {
        assert!(Stack::new("WebsiteStack", AwsEnvironment::default()).is_ok());
        assert!(Stack::new("site-2", AwsEnvironment::default()).is_ok());
        assert!(Stack::new("2site", AwsEnvironment::default()).is_err());
        assert!(Stack::new("my_stack", AwsEnvironment::default()).is_err());
        assert!(Stack::new("", AwsEnvironment::default()).is_err());
    }
}
