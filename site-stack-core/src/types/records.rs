//! DNS record declarations

use serde::{Deserialize, Serialize};

use site_stack_provider::DnsRecordType;

/// TTL (seconds) applied to every declared record.
pub const DEFAULT_RECORD_TTL: u32 = 1800;

/// One entry of the records file.
///
/// ```json
/// { "type": "MX", "name": "example.com", "values": ["10 mail.example.com"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordDeclaration {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    pub name: String,
    pub values: Vec<String>,
}

/// A record declared in the domain stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    pub record_type: DnsRecordType,
    /// `None` for the zone apex.
    pub record_name: Option<String>,
    pub values: Vec<String>,
    pub ttl: u32,
}

impl RecordSet {
    /// Build the record for a declaration in the zone of `domain_name`.
    ///
    /// A name equal to the domain (compared verbatim) targets the apex.
    pub fn from_declaration(declaration: &DnsRecordDeclaration, domain_name: &str) -> Self {
        let record_name = if declaration.name == domain_name {
            None
        } else {
            Some(declaration.name.clone())
        };
        Self {
            record_type: declaration.record_type,
            record_name,
            values: declaration.values.clone(),
            ttl: DEFAULT_RECORD_TTL,
        }
    }

    /// Fully qualified record name inside `zone_name` (with trailing dot).
    ///
    /// Relative names are suffixed with the zone; names already inside the
    /// zone are kept.
    pub fn fqdn(&self, zone_name: &str) -> String {
        fully_qualified(self.record_name.as_deref(), zone_name)
    }
}

/// `None` → `zone.`; `www` → `www.zone.`; `www.zone` → `www.zone.`
///
/// A name ending with `.` is absolute and returned unchanged.
pub fn fully_qualified(record_name: Option<&str>, zone_name: &str) -> String {
    let zone = zone_name.trim_end_matches('.');
    match record_name {
        None | Some("") => format!("{zone}."),
        Some(name) if name.ends_with('.') => name.to_string(),
        Some(name) if name == zone || name.ends_with(&format!(".{zone}")) => format!("{name}."),
        Some(name) => format!("{name}.{zone}."),
    }
}
