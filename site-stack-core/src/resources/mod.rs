//! Resource builders
//!
//! Each function returns a ready-to-insert [`Resource`](crate::types::Resource);
//! stacks only choose logical IDs and wire references between them.

pub mod acm;
pub mod cloudfront;
pub mod custom;
pub mod route53;
pub mod s3;
