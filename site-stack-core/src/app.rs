//! Stack composition and synthesis
//!
//! [`SiteApp`] owns the stacks of one run. Dependencies come from two places:
//! explicit edges added with [`SiteApp::add_dependency`] and the cross-stack
//! imports each stack recorded while it was built.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde_json::json;

use crate::error::{CoreError, CoreResult};
use crate::services::assembly_writer::{
    asset_manifest, asset_manifest_file_name, template_file_name, to_pretty_json,
};
use crate::services::AssemblyWriter;
use crate::stacks::{apply_export, Stack};
use crate::types::{
    Artifact, AssemblyManifest, Template, ASSET_MANIFEST_ARTIFACT_TYPE, STACK_ARTIFACT_TYPE,
};

/// Stacks of one synthesis run.
#[derive(Debug, Default)]
pub struct SiteApp {
    stacks: Vec<Stack>,
    /// (dependent, dependency)
    dependencies: Vec<(String, String)>,
}

impl SiteApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack. Stack names are unique within an app.
    pub fn add_stack(&mut self, stack: Stack) -> CoreResult<()> {
        if self.stack(stack.name()).is_some() {
            return Err(CoreError::ValidationError(format!(
                "duplicate stack name: {}",
                stack.name()
            )));
        }
        log::debug!("Added stack {} ({})", stack.name(), stack.env().to_uri());
        self.stacks.push(stack);
        Ok(())
    }

    /// Declare that `dependent` deploys after `dependency`.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> CoreResult<()> {
        for name in [dependent, dependency] {
            if self.stack(name).is_none() {
                return Err(CoreError::ValidationError(format!("unknown stack: {name}")));
            }
        }
        if dependent == dependency {
            return Err(CoreError::ValidationError(format!(
                "{dependent} cannot depend on itself"
            )));
        }
        if self.depends_transitively(dependency, dependent) {
            return Err(CoreError::ValidationError(format!(
                "dependency cycle: {dependency} already depends on {dependent}"
            )));
        }

        let edge = (dependent.to_string(), dependency.to_string());
        if !self.dependencies.contains(&edge) {
            self.dependencies.push(edge);
        }
        Ok(())
    }

    /// Stacks in insertion order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    /// Direct dependencies of `name`: explicit edges, then import producers.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let mut result: Vec<&str> = self
            .dependencies
            .iter()
            .filter(|(dependent, _)| dependent == name)
            .map(|(_, dependency)| dependency.as_str())
            .collect();
        if let Some(stack) = self.stack(name) {
            for producer in stack.referenced_stacks() {
                if !result.contains(&producer) {
                    result.push(producer);
                }
            }
        }
        result
    }

    fn depends_transitively(&self, from: &str, target: &str) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![from];
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if seen.insert(current) {
                pending.extend(self.dependencies_of(current));
            }
        }
        false
    }

    /// Stacks ordered so that every stack follows its dependencies.
    ///
    /// Ties keep insertion order.
    pub fn synthesis_order(&self) -> CoreResult<Vec<&Stack>> {
        for stack in &self.stacks {
            for dependency in self.dependencies_of(stack.name()) {
                if self.stack(dependency).is_none() {
                    return Err(CoreError::ValidationError(format!(
                        "{} references unknown stack {dependency}",
                        stack.name()
                    )));
                }
            }
        }

        let mut ordered: Vec<&Stack> = Vec::with_capacity(self.stacks.len());
        let mut placed: HashSet<&str> = HashSet::new();
        while ordered.len() < self.stacks.len() {
            let next = self.stacks.iter().find(|stack| {
                !placed.contains(stack.name())
                    && self
                        .dependencies_of(stack.name())
                        .iter()
                        .all(|d| placed.contains(d))
            });
            let Some(next) = next else {
                let remaining: Vec<&str> = self
                    .stacks
                    .iter()
                    .map(Stack::name)
                    .filter(|n| !placed.contains(n))
                    .collect();
                return Err(CoreError::ValidationError(format!(
                    "dependency cycle between stacks: {}",
                    remaining.join(", ")
                )));
            };
            placed.insert(next.name());
            ordered.push(next);
        }
        Ok(ordered)
    }

    /// Final templates with every producer-side export applied.
    pub fn render_templates(&self) -> CoreResult<BTreeMap<String, Template>> {
        let mut templates: BTreeMap<String, Template> = self
            .stacks
            .iter()
            .map(|s| (s.name().to_string(), s.template().clone()))
            .collect();

        for stack in &self.stacks {
            for import in stack.imports() {
                let producer = templates.get_mut(&import.producer).ok_or_else(|| {
                    CoreError::ValidationError(format!(
                        "{} references unknown stack {}",
                        import.consumer, import.producer
                    ))
                })?;
                apply_export(producer, import)?;
            }
        }
        Ok(templates)
    }

    /// 合成云组装目录
    ///
    /// 先完成全部渲染与校验，再写入磁盘；任何错误都不会留下部分输出。
    pub fn synth(&self, out_dir: &Path) -> CoreResult<AssemblyManifest> {
        let order = self.synthesis_order()?;
        let templates = self.render_templates()?;

        let mut files: Vec<(String, String)> = Vec::new();
        let mut manifest = AssemblyManifest::default();

        for stack in &order {
            let name = stack.name();
            let template = templates.get(name).ok_or_else(|| {
                CoreError::ValidationError(format!("no template rendered for {name}"))
            })?;
            let template_file = template_file_name(name);
            files.push((template_file.clone(), template.to_json()?));

            let mut dependencies: Vec<String> = self
                .dependencies_of(name)
                .into_iter()
                .map(str::to_string)
                .collect();

            if !stack.assets().is_empty() {
                let asset_id = format!("{name}.assets");
                let asset_file = asset_manifest_file_name(name);
                files.push((
                    asset_file.clone(),
                    to_pretty_json(&asset_manifest(stack.env(), stack.assets()))?,
                ));
                manifest.artifacts.insert(
                    asset_id.clone(),
                    Artifact {
                        artifact_type: ASSET_MANIFEST_ARTIFACT_TYPE.to_string(),
                        environment: None,
                        properties: json!({
                            "file": asset_file,
                            "requiresBootstrapStackVersion": 6,
                        }),
                        dependencies: Vec::new(),
                        display_name: Some(format!("{name} Assets")),
                    },
                );
                dependencies.push(asset_id);
            }

            manifest.artifacts.insert(
                name.to_string(),
                Artifact {
                    artifact_type: STACK_ARTIFACT_TYPE.to_string(),
                    environment: Some(stack.env().to_uri()),
                    properties: json!({
                        "templateFile": template_file,
                        "stackName": name,
                    }),
                    dependencies,
                    display_name: Some(name.to_string()),
                },
            );
        }

        let writer = AssemblyWriter::new(out_dir);
        writer.prepare()?;
        for (file_name, content) in &files {
            writer.write_file(file_name, content)?;
        }
        for stack in &order {
            writer.stage_assets(stack.assets())?;
        }
        writer.write_manifest(&manifest)?;

        log::info!(
            "Synthesized {} stack(s) to {}",
            order.len(),
            out_dir.display()
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AwsEnvironment;

    fn app(names: &[&str]) -> SiteApp {
        let mut app = SiteApp::new();
        for name in names {
            let added = Stack::new(name, AwsEnvironment::default()).and_then(|s| app.add_stack(s));
            assert!(added.is_ok(), "{name}");
        }
        app
    }

    #[test]
    fn duplicate_stack_is_rejected() {
        let mut app = app(&["DomainStack"]);
        let Ok(duplicate) = Stack::new("DomainStack", AwsEnvironment::default()) else {
            return;
        };
        assert!(matches!(
            app.add_stack(duplicate),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn dependency_edges_are_validated() {
        let mut app = app(&["DomainStack", "WebsiteStack"]);
        assert!(app.add_dependency("WebsiteStack", "Missing").is_err());
        assert!(app.add_dependency("WebsiteStack", "WebsiteStack").is_err());
        assert!(app.add_dependency("WebsiteStack", "DomainStack").is_ok());
        // 重复添加是幂等的
        assert!(app.add_dependency("WebsiteStack", "DomainStack").is_ok());
        assert_eq!(app.dependencies_of("WebsiteStack"), vec!["DomainStack"]);
        assert!(matches!(
            app.add_dependency("DomainStack", "WebsiteStack"),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn order_follows_dependencies() {
        let mut app = app(&["WebsiteStack", "Extra", "DomainStack"]);
        assert!(app.add_dependency("WebsiteStack", "DomainStack").is_ok());

        let order = app.synthesis_order();
        assert!(order.is_ok());
        let names: Vec<&str> = order.unwrap_or_default().into_iter().map(Stack::name).collect();
        assert_eq!(names, vec!["Extra", "DomainStack", "WebsiteStack"]);
    }

    #[test]
    fn synth_writes_templates_and_manifest() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let mut app = app(&["DomainStack", "WebsiteStack"]);
        assert!(app.add_dependency("WebsiteStack", "DomainStack").is_ok());

        let manifest = app.synth(dir.path());
        assert!(manifest.is_ok(), "{manifest:?}");
        let Ok(manifest) = manifest else {
            return;
        };

        assert!(dir.path().join("DomainStack.template.json").is_file());
        assert!(dir.path().join("WebsiteStack.template.json").is_file());
        assert!(dir.path().join("manifest.json").is_file());
        // 无资源的栈不写资源清单
        assert!(!dir.path().join("WebsiteStack.assets.json").exists());

        let website = &manifest.artifacts["WebsiteStack"];
        assert_eq!(website.artifact_type, STACK_ARTIFACT_TYPE);
        assert_eq!(website.dependencies, vec!["DomainStack"]);
        assert_eq!(
            website.environment.as_deref(),
            Some("aws://unknown-account/unknown-region")
        );
    }
}
