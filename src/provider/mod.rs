pub mod dreamhost;

use thiserror::Error;

/// An A record as reported by the provider. The provider owns it; we only
/// ever read it or replace it wholesale (remove, then add).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsRecord {
    /// Fully-qualified name, e.g. `host.example.com`.
    pub record: Box<str>,

    /// Record type as the provider spells it ("A").
    pub kind: Box<str>,

    /// The IP literal the record currently points at.
    pub value: Box<str>,

    pub comment: Box<str>,
}

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{action}: HTTP transport error: {reason}")]
    Transport {
        action: &'static str,
        reason: Box<str>,
    },

    // used when the provider answered, but the JSON is nonsense
    #[error("{action}: received erroneous JSON: {reason}")]
    Json {
        action: &'static str,
        reason: Box<str>,
    },

    #[error("{action}: provider rejected the request: {message}")]
    Rejected {
        action: &'static str,
        message: Box<str>,
    },
}

pub trait DnsProvider {
    /// Looks the domain up among the account's records, matching the name
    /// case-insensitively. Returns the first match.
    fn list_record(&self, domain: &str) -> Result<Option<DnsRecord>, ProviderError>;

    /// Creates an A record pointing `domain` at `ip`.
    fn add_record(&self, domain: &str, ip: &str) -> Result<(), ProviderError>;

    /// Deletes the given record. Callers guard against absent records
    /// themselves; this always issues the request.
    fn remove_record(&self, record: &DnsRecord) -> Result<(), ProviderError>;
}
