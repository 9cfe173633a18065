//! Cross-stack references
//!
//! The consumer side is rendered when the consuming stack is built; the
//! producer side (output export or SSM parameter) is added to the producer's
//! template at synthesis time, once every consumer is known.
//!
//! - same region: `Outputs.<id>.Export` + `Fn::ImportValue`
//! - different regions: an `AWS::SSM::Parameter` written in the producer
//!   region, read back through a cross-region reader custom resource

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::resources::custom::{cross_region_reader, ssm_export};
use crate::types::{fn_get_att, fn_import_value, fn_ref, AwsEnvironment, Export, Output, Template};

use super::Stack;

/// Logical ID of the reader resource in consuming stacks.
pub const CROSS_REGION_READER_ID: &str = "ExportsReader";

/// SSM namespace for cross-region exports.
pub const EXPORT_PARAMETER_PREFIX: &str = "/site-stack/exports";

/// Handle to a certificate declared in another stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRef {
    /// Stack declaring the certificate.
    pub stack_name: String,
    /// Logical ID of the certificate resource.
    pub logical_id: String,
    /// Environment of the declaring stack.
    pub env: AwsEnvironment,
    /// Primary domain the certificate covers.
    pub domain_name: String,
}

/// How a value leaves its producing stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMechanism {
    /// CloudFormation output export, imported by name.
    Output { output_id: String, export_name: String },
    /// SSM parameter read by a cross-region reader.
    SsmParameter { parameter_name: String },
}

/// A value one stack reads from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossStackImport {
    pub producer: String,
    pub consumer: String,
    /// Logical ID of the referenced resource (rendered as `Ref`).
    pub logical_id: String,
    pub mechanism: ExportMechanism,
}

/// Render the certificate ARN inside `consumer` and record the import.
pub fn import_certificate_arn(consumer: &mut Stack, certificate: &CertificateRef) -> CoreResult<Value> {
    let producer_region = certificate.env.region.as_deref().ok_or_else(|| {
        CoreError::ValidationError(format!(
            "{} has no region; cross-stack references need concrete regions",
            certificate.stack_name
        ))
    })?;
    let consumer_region = consumer.env().region.clone().ok_or_else(|| {
        CoreError::ValidationError(format!(
            "{} has no region; set CDK_DEFAULT_REGION or --region to reference {}",
            consumer.name(),
            certificate.stack_name
        ))
    })?;

    let output_id = format!("ExportsOutputRef{}", certificate.logical_id);

    if producer_region == consumer_region {
        let export_name = format!("{}:{output_id}", certificate.stack_name);
        let value = fn_import_value(&export_name);
        consumer.add_import(CrossStackImport {
            producer: certificate.stack_name.clone(),
            consumer: consumer.name().to_string(),
            logical_id: certificate.logical_id.clone(),
            mechanism: ExportMechanism::Output {
                output_id,
                export_name,
            },
        });
        return Ok(value);
    }

    log::debug!(
        "{} ({consumer_region}) reads {} from {} ({producer_region}) through SSM",
        consumer.name(),
        certificate.logical_id,
        certificate.stack_name
    );

    let prefix = format!("{EXPORT_PARAMETER_PREFIX}/{}/", consumer.name());
    let parameter_name = format!("{prefix}{}{output_id}", certificate.stack_name);

    let mut reader_imports = existing_reader_imports(consumer.template());
    reader_imports.insert(
        parameter_name.clone(),
        format!("{{{{resolve:ssm:{parameter_name}}}}}"),
    );
    consumer
        .template_mut()
        .resources
        .insert(
            CROSS_REGION_READER_ID.to_string(),
            cross_region_reader(producer_region, &prefix, &reader_imports),
        );

    consumer.add_import(CrossStackImport {
        producer: certificate.stack_name.clone(),
        consumer: consumer.name().to_string(),
        logical_id: certificate.logical_id.clone(),
        mechanism: ExportMechanism::SsmParameter {
            parameter_name: parameter_name.clone(),
        },
    });

    Ok(fn_get_att(CROSS_REGION_READER_ID, &parameter_name))
}

/// Imports already present on the consumer's reader resource.
fn existing_reader_imports(template: &Template) -> BTreeMap<String, String> {
    template
        .resource(CROSS_REGION_READER_ID)
        .and_then(|r| r.properties.get("ReaderProps"))
        .and_then(|p| p.get("imports"))
        .and_then(Value::as_object)
        .map(|imports| {
            imports
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Add the producer side of `import` to the producer's template.
///
/// Applying the same import twice is a no-op.
pub fn apply_export(producer: &mut Template, import: &CrossStackImport) -> CoreResult<()> {
    if producer.resource(&import.logical_id).is_none() {
        return Err(CoreError::ValidationError(format!(
            "{} references {} which {} does not declare",
            import.consumer, import.logical_id, import.producer
        )));
    }

    match &import.mechanism {
        ExportMechanism::Output {
            output_id,
            export_name,
        } => {
            if producer.outputs.contains_key(output_id) {
                return Ok(());
            }
            producer.add_output(
                output_id,
                Output {
                    value: fn_ref(&import.logical_id),
                    description: None,
                    export: Some(Export {
                        name: export_name.clone(),
                    }),
                },
            )
        }
        ExportMechanism::SsmParameter { parameter_name } => {
            let writer_id: String = format!("ExportsWriter{}{}", import.consumer, import.logical_id)
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect();
            if producer.resources.contains_key(&writer_id) {
                return Ok(());
            }
            producer.add_resource(
                &writer_id,
                ssm_export(parameter_name, fn_ref(&import.logical_id)),
            )
        }
    }
}
