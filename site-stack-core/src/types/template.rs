//! CloudFormation template model

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{CoreError, CoreResult};

/// Template format version written into every template.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// SSM parameter holding the deployed bootstrap version.
pub const BOOTSTRAP_VERSION_PARAMETER: &str = "/cdk-bootstrap/hnb659fds/version";

/// Deletion behavior of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
}

/// A single resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl Resource {
    /// Create a resource of the given type with no properties.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Map::new(),
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Set a property.
    #[must_use]
    pub fn property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Add an explicit `DependsOn` entry.
    #[must_use]
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Apply the same policy on deletion and on replacement.
    #[must_use]
    pub fn removal_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }
}

/// Export attached to an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

/// A stack output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

/// A template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A complete template.
///
/// Maps are ordered by logical ID so rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
    pub resources: BTreeMap<String, Resource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Template {
    /// Empty template carrying the bootstrap version parameter.
    pub fn new() -> Self {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "BootstrapVersion".to_string(),
            Parameter {
                parameter_type: "AWS::SSM::Parameter::Value<String>".to_string(),
                default: Some(BOOTSTRAP_VERSION_PARAMETER.to_string()),
                description: Some(
                    "Version of the bootstrap resources in this environment, \
                     automatically retrieved from SSM Parameter Store."
                        .to_string(),
                ),
            },
        );
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: None,
            parameters,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource. Logical IDs are unique within a template.
    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> CoreResult<()> {
        validate_logical_id(logical_id)?;
        if self.resources.contains_key(logical_id) {
            return Err(CoreError::ValidationError(format!(
                "duplicate logical id: {logical_id}"
            )));
        }
        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    /// Add an output. Output IDs are unique within a template.
    pub fn add_output(&mut self, output_id: &str, output: Output) -> CoreResult<()> {
        validate_logical_id(output_id)?;
        if self.outputs.contains_key(output_id) {
            return Err(CoreError::ValidationError(format!(
                "duplicate output id: {output_id}"
            )));
        }
        self.outputs.insert(output_id.to_string(), output);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Logical IDs of all resources of the given type.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::SerializationError(e.to_string()))
    }
}

/// Logical IDs are 1-255 ASCII alphanumeric characters.
fn validate_logical_id(logical_id: &str) -> CoreResult<()> {
    if logical_id.is_empty() || logical_id.len() > 255 {
        return Err(CoreError::ValidationError(format!(
            "invalid logical id {logical_id:?}: must be 1-255 characters"
        )));
    }
    if !logical_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::ValidationError(format!(
            "invalid logical id {logical_id:?}: must contain only [A-Za-z0-9]"
        )));
    }
    Ok(())
}

// ============ Intrinsic functions ============

/// `{"Ref": id}`
pub fn fn_ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn fn_get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::ImportValue": name}`
pub fn fn_import_value(export_name: &str) -> Value {
    json!({ "Fn::ImportValue": export_name })
}

/// `{"Fn::Join": [delimiter, parts]}`
pub fn fn_join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

/// `{"Fn::Sub": template}`
pub fn fn_sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}
