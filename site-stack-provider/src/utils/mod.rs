//! Helpers shared by the backends.

/// Masking and truncation of values written to logs.
pub mod log_sanitizer;
