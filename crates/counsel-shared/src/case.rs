//! Case records tracked by the daemon.
//!
//! A case is a legal matter with a name, a category and two timestamps.
//! The category is a closed set of known kinds plus a catch-all that keeps
//! whatever string the client sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for the n-th allocated case, e.g. `CASE-000042`
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("CASE-{:06}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case category
///
/// Serialized as its display label. Matching is exact and case-sensitive:
/// "consumer complaint" is not `ConsumerComplaint`, it lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaseType {
    ConsumerComplaint,
    ContractDispute,
    PropertyDispute,
    /// Unrecognized label, kept verbatim
    Other(String),
}

impl CaseType {
    pub const CONSUMER_COMPLAINT: &'static str = "Consumer complaint";
    pub const CONTRACT_DISPUTE: &'static str = "Contract dispute";
    pub const PROPERTY_DISPUTE: &'static str = "Property dispute";

    pub fn parse(label: &str) -> Self {
        match label {
            Self::CONSUMER_COMPLAINT => Self::ConsumerComplaint,
            Self::CONTRACT_DISPUTE => Self::ContractDispute,
            Self::PROPERTY_DISPUTE => Self::PropertyDispute,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::ConsumerComplaint => Self::CONSUMER_COMPLAINT,
            Self::ContractDispute => Self::CONTRACT_DISPUTE,
            Self::PropertyDispute => Self::PROPERTY_DISPUTE,
            Self::Other(label) => label,
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for CaseType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CaseType> for String {
    fn from(t: CaseType) -> Self {
        t.label().to_string()
    }
}

/// A legal matter record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub case_id: CaseId,
    pub name: String,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    pub created_on: DateTime<Utc>,
    pub last_modified_on: DateTime<Utc>,
}

impl Case {
    pub fn new(case_id: CaseId, name: impl Into<String>, case_type: CaseType) -> Self {
        let now = Utc::now();
        Self {
            case_id,
            name: name.into(),
            case_type,
            created_on: now,
            last_modified_on: now,
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.last_modified_on = Utc::now();
    }
}
