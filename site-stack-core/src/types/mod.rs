//! 类型定义模块

mod assembly;
mod records;
mod template;

pub use assembly::{
    Artifact, AssemblyManifest, AssetManifest, FileAssetDestination, FileAssetEntry,
    FileAssetSource, ASSEMBLY_VERSION, ASSET_MANIFEST_ARTIFACT_TYPE, STACK_ARTIFACT_TYPE,
};
pub use records::{fully_qualified, DnsRecordDeclaration, RecordSet, DEFAULT_RECORD_TTL};
pub use template::{
    fn_get_att, fn_import_value, fn_join, fn_ref, fn_sub, DeletionPolicy, Export, Output,
    Parameter, Resource, Template, BOOTSTRAP_VERSION_PARAMETER, TEMPLATE_FORMAT_VERSION,
};

// Re-export provider 库的公共类型
pub use site_stack_provider::{
    AwsEnvironment, DnsRecordType, HostedZone, ZoneLookupQuery, CERTIFICATE_REGION,
};
