//! Cloud assembly manifests

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Schema version written into every manifest.
pub const ASSEMBLY_VERSION: &str = "36.0.0";

/// Artifact type of a deployable stack.
pub const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";
/// Artifact type of a stack's asset manifest.
pub const ASSET_MANIFEST_ARTIFACT_TYPE: &str = "cdk:asset-manifest";

/// `manifest.json` at the root of the assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyManifest {
    pub version: String,
    pub artifacts: BTreeMap<String, Artifact>,
}

impl Default for AssemblyManifest {
    fn default() -> Self {
        Self {
            version: ASSEMBLY_VERSION.to_string(),
            artifacts: BTreeMap::new(),
        }
    }
}

/// One entry of [`AssemblyManifest::artifacts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "type")]
    pub artifact_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub properties: Value,
    /// Artifacts deployed before this one, in deployment order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// `<Stack>.assets.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub version: String,
    pub files: BTreeMap<String, FileAssetEntry>,
    pub docker_images: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAssetEntry {
    pub source: FileAssetSource,
    pub destinations: BTreeMap<String, FileAssetDestination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAssetSource {
    /// Path relative to the assembly root.
    pub path: String,
    pub packaging: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAssetDestination {
    pub bucket_name: String,
    pub object_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}
