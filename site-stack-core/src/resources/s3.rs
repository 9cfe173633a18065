//! S3 buckets and bucket policies

use serde_json::{json, Value};

use crate::types::{fn_get_att, fn_join, fn_ref, DeletionPolicy, Resource};

use super::custom::{bootstrap_import, AUTO_DELETE_OBJECTS_ROLE};

pub const BUCKET_TYPE: &str = "AWS::S3::Bucket";
pub const BUCKET_POLICY_TYPE: &str = "AWS::S3::BucketPolicy";

/// Tag marking buckets emptied by the auto-delete handler before removal.
pub const AUTO_DELETE_TAG: &str = "aws-cdk:auto-delete-objects";

/// Bucket with every public access path blocked, removed with the stack.
pub fn private_bucket(auto_delete_objects: bool) -> Resource {
    let mut bucket = Resource::new(BUCKET_TYPE)
        .property(
            "PublicAccessBlockConfiguration",
            json!({
                "BlockPublicAcls": true,
                "BlockPublicPolicy": true,
                "IgnorePublicAcls": true,
                "RestrictPublicBuckets": true,
            }),
        )
        .removal_policy(DeletionPolicy::Delete);
    if auto_delete_objects {
        bucket = bucket.property("Tags", json!([{ "Key": AUTO_DELETE_TAG, "Value": "true" }]));
    }
    bucket
}

/// Policy document attached to `bucket_id`.
pub fn bucket_policy(bucket_id: &str, statements: Vec<Value>) -> Resource {
    Resource::new(BUCKET_POLICY_TYPE)
        .property("Bucket", fn_ref(bucket_id))
        .property(
            "PolicyDocument",
            json!({ "Version": "2012-10-17", "Statement": statements }),
        )
}

/// `arn:...:bucket/*`
pub fn objects_arn(bucket_id: &str) -> Value {
    fn_join("", vec![fn_get_att(bucket_id, "Arn"), json!("/*")])
}

/// Read access for one distribution, through origin access control.
pub fn distribution_read_statement(bucket_id: &str, distribution_id: &str) -> Value {
    json!({
        "Action": "s3:GetObject",
        "Condition": {
            "StringEquals": {
                "AWS:SourceArn": fn_join("", vec![
                    json!("arn:"),
                    fn_ref("AWS::Partition"),
                    json!(":cloudfront::"),
                    fn_ref("AWS::AccountId"),
                    json!(":distribution/"),
                    fn_ref(distribution_id),
                ]),
            }
        },
        "Effect": "Allow",
        "Principal": { "Service": "cloudfront.amazonaws.com" },
        "Resource": objects_arn(bucket_id),
    })
}

/// Permissions the auto-delete handler needs to empty the bucket.
pub fn auto_delete_statement(bucket_id: &str) -> Value {
    json!({
        "Action": ["s3:PutBucketPolicy", "s3:GetBucket*", "s3:List*", "s3:DeleteObject*"],
        "Effect": "Allow",
        "Principal": { "AWS": bootstrap_import(AUTO_DELETE_OBJECTS_ROLE) },
        "Resource": [fn_get_att(bucket_id, "Arn"), objects_arn(bucket_id)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_blocks_public_access_and_is_destroyed() {
        let bucket = private_bucket(true);
        let block = &bucket.properties["PublicAccessBlockConfiguration"];
        for key in [
            "BlockPublicAcls",
            "BlockPublicPolicy",
            "IgnorePublicAcls",
            "RestrictPublicBuckets",
        ] {
            assert_eq!(block[key], true, "{key}");
        }
        assert_eq!(bucket.deletion_policy, Some(DeletionPolicy::Delete));
        assert_eq!(bucket.update_replace_policy, Some(DeletionPolicy::Delete));
        assert_eq!(bucket.properties["Tags"][0]["Key"], AUTO_DELETE_TAG);
    }

    #[test]
    fn read_statement_is_scoped_to_distribution() {
        let statement = distribution_read_statement("Bucket", "CloudFrontDistribution");
        assert_eq!(statement["Principal"]["Service"], "cloudfront.amazonaws.com");
        assert_eq!(statement["Action"], "s3:GetObject");
        let source_arn = &statement["Condition"]["StringEquals"]["AWS:SourceArn"]["Fn::Join"][1];
        assert_eq!(source_arn[5], json!({"Ref": "CloudFrontDistribution"}));
    }
}
