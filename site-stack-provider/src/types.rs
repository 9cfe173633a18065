use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============ DNS Record Types ============

/// DNS record kinds accepted in a hosted zone.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.), matching the
/// `Type` property of `AWS::Route53::RecordSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Certificate Authority Authorization record.
    Caa,
    /// Canonical name (alias) record.
    Cname,
    /// Delegation signer record.
    Ds,
    /// HTTPS service binding record.
    Https,
    /// Mail exchange record.
    Mx,
    /// Naming authority pointer record.
    Naptr,
    /// Name server record.
    Ns,
    /// Pointer record.
    Ptr,
    /// Start of authority record.
    Soa,
    /// Sender policy framework record.
    Spf,
    /// Service locator record.
    Srv,
    /// SSH public key fingerprint record.
    Sshfp,
    /// General service binding record.
    Svcb,
    /// TLSA certificate association record.
    Tlsa,
    /// Text record.
    Txt,
}

impl DnsRecordType {
    /// Every supported record kind, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::A,
        Self::Aaaa,
        Self::Caa,
        Self::Cname,
        Self::Ds,
        Self::Https,
        Self::Mx,
        Self::Naptr,
        Self::Ns,
        Self::Ptr,
        Self::Soa,
        Self::Spf,
        Self::Srv,
        Self::Sshfp,
        Self::Svcb,
        Self::Tlsa,
        Self::Txt,
    ];

    /// Returns the wire name of this record kind (e.g. `"AAAA"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Ds => "DS",
            Self::Https => "HTTPS",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Spf => "SPF",
            Self::Srv => "SRV",
            Self::Sshfp => "SSHFP",
            Self::Svcb => "SVCB",
            Self::Tlsa => "TLSA",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a supported record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordType(pub String);

impl fmt::Display for UnknownRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported record type: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordType {}

impl FromStr for DnsRecordType {
    type Err = UnknownRecordType;

    /// 记录类型必须与枚举成员完全一致（区分大小写），与配置文件约定保持一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

// ============ Environment ============

/// Region where certificates consumed by a CDN distribution must live.
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// Target account/region pair of a stack.
///
/// Either part may be unknown at synthesis time; the provisioning backend then
/// resolves it from its own configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsEnvironment {
    /// AWS account ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// AWS region (e.g. `"us-east-1"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl AwsEnvironment {
    /// Create an environment from optional account and region values.
    pub fn new(account: Option<String>, region: Option<String>) -> Self {
        Self { account, region }
    }

    /// Environment URI used in assembly manifests (`aws://<account>/<region>`).
    ///
    /// Unknown parts are written as `unknown-account` / `unknown-region`.
    pub fn to_uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region.as_deref().unwrap_or("unknown-region")
        )
    }

    /// Whether both environments are known to target the same region.
    pub fn same_region(&self, other: &Self) -> bool {
        match (&self.region, &other.region) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

// ============ Hosted Zone ============

/// An existing hosted zone, resolved by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Zone ID as returned by Route53 (`"/hostedzone/Z123"` or bare `"Z123"`).
    #[serde(rename = "Id")]
    pub id: String,
    /// Zone name, usually with a trailing dot (`"example.com."`).
    #[serde(rename = "Name")]
    pub name: String,
}

impl HostedZone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Bare zone ID without the `/hostedzone/` prefix.
    pub fn zone_id(&self) -> &str {
        self.id.strip_prefix("/hostedzone/").unwrap_or(&self.id)
    }

    /// Zone name without the trailing dot.
    pub fn zone_name(&self) -> &str {
        self.name.trim_end_matches('.')
    }
}

/// Parameters of a hosted zone lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLookupQuery {
    /// Exact zone name to look up (trailing dot optional).
    pub domain_name: String,
    /// Environment the lookup is performed for (used as cache key).
    pub env: AwsEnvironment,
    /// Whether to match private zones instead of public ones.
    pub private_zone: bool,
}

impl ZoneLookupQuery {
    pub fn new(domain_name: impl Into<String>, env: AwsEnvironment) -> Self {
        Self {
            domain_name: domain_name.into(),
            env,
            private_zone: false,
        }
    }

    /// Normalized domain name (no trailing dot).
    pub fn normalized_domain(&self) -> &str {
        self.domain_name.trim_end_matches('.')
    }

    /// Key under which the result is cached in the context file.
    ///
    /// 格式: `hosted-zone:account=<acct>:domainName=<name>:region=<region>`
    pub fn context_key(&self) -> String {
        let mut key = format!(
            "hosted-zone:account={}:domainName={}:region={}",
            self.env.account.as_deref().unwrap_or("unknown-account"),
            self.normalized_domain(),
            self.env.region.as_deref().unwrap_or("unknown-region"),
        );
        if self.private_zone {
            key.push_str(":privateZone=true");
        }
        key
    }
}
