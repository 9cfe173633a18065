//! Custom resources backed by the bootstrap stack
//!
//! Handler functions are deployed once per environment by the bootstrap stack
//! and exported as `<BOOTSTRAP_STACK>-<name>`; templates only import their ARNs.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::services::FileAsset;
use crate::types::{fn_import_value, fn_ref, fn_sub, DeletionPolicy, Resource};

/// Name of the bootstrap stack exporting handler ARNs.
pub const BOOTSTRAP_STACK: &str = "SiteStackBootstrap";

pub const AUTO_DELETE_OBJECTS_PROVIDER: &str = "AutoDeleteObjectsProvider";
pub const AUTO_DELETE_OBJECTS_ROLE: &str = "AutoDeleteObjectsRoleArn";
pub const BUCKET_DEPLOYMENT_PROVIDER: &str = "BucketDeploymentProvider";
pub const CROSS_REGION_READER_PROVIDER: &str = "CrossRegionReaderProvider";

/// Staging bucket the asset publisher uploads to.
pub const ASSETS_BUCKET: &str = "cdk-hnb659fds-assets-${AWS::AccountId}-${AWS::Region}";

pub const SSM_PARAMETER_TYPE: &str = "AWS::SSM::Parameter";

/// `{"Fn::ImportValue": "<bootstrap>-<name>"}`
pub fn bootstrap_import(name: &str) -> Value {
    fn_import_value(&format!("{BOOTSTRAP_STACK}-{name}"))
}

/// Empties a bucket before it is deleted.
pub fn auto_delete_objects(bucket_id: &str, policy_id: &str) -> Resource {
    Resource::new("Custom::S3AutoDeleteObjects")
        .property("ServiceToken", bootstrap_import(AUTO_DELETE_OBJECTS_PROVIDER))
        .property("BucketName", fn_ref(bucket_id))
        .depends_on(policy_id)
        .removal_policy(DeletionPolicy::Delete)
}

/// Copies a published asset into `bucket_id` and invalidates `paths`.
pub fn bucket_deployment(
    asset: &FileAsset,
    bucket_id: &str,
    distribution_id: Option<&str>,
    paths: &[&str],
) -> Resource {
    let mut resource = Resource::new("Custom::CDKBucketDeployment")
        .property("ServiceToken", bootstrap_import(BUCKET_DEPLOYMENT_PROVIDER))
        .property("SourceBucketNames", json!([fn_sub(ASSETS_BUCKET)]))
        .property("SourceObjectKeys", json!([asset.object_key()]))
        .property("DestinationBucketName", fn_ref(bucket_id))
        .property("Prune", json!(true));
    if let Some(distribution_id) = distribution_id {
        resource = resource
            .property("DistributionId", fn_ref(distribution_id))
            .property("DistributionPaths", json!(paths));
    }
    resource.removal_policy(DeletionPolicy::Delete)
}

/// String parameter carrying a value to another region.
pub fn ssm_export(parameter_name: &str, value: Value) -> Resource {
    Resource::new(SSM_PARAMETER_TYPE)
        .property("Name", json!(parameter_name))
        .property("Type", json!("String"))
        .property("Value", value)
}

/// Reads SSM parameters written in `region`.
///
/// Each key of `imports` becomes an attribute of the resource
/// (`Fn::GetAtt [id, <parameter name>]`).
pub fn cross_region_reader(region: &str, prefix: &str, imports: &BTreeMap<String, String>) -> Resource {
    let imports: serde_json::Map<String, Value> = imports
        .iter()
        .map(|(name, placeholder)| (name.clone(), json!(placeholder)))
        .collect();
    Resource::new("Custom::CrossRegionExportReader")
        .property("ServiceToken", bootstrap_import(CROSS_REGION_READER_PROVIDER))
        .property(
            "ReaderProps",
            json!({
                "region": region,
                "prefix": prefix,
                "imports": imports,
            }),
        )
        .removal_policy(DeletionPolicy::Delete)
}
