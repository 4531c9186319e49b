use clap::ValueEnum;
use serde_derive::Deserialize;

use crate::provider::{DnsProvider, ProviderError};
use crate::state::DnsState;

/// Which side of the comparison is trusted when deciding whether an update
/// is needed.
///
/// `Remote` re-fetches the live record every run and can never drift, at the
/// cost of one list-records call even when nothing changed. `Cache` trusts
/// the local state file and skips the provider entirely on a hit, but a cache
/// edited behind our back goes unnoticed until the IP next changes. The two
/// are kept as distinct strategies on purpose; there is no blended mode.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    Remote,
    Cache,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No record existed for the domain; one was added.
    Created { ip: Box<str> },

    /// The record pointed elsewhere and was replaced.
    Updated { from: Box<str>, to: Box<str> },

    /// The record already points at the desired IP.
    Unchanged { ip: Box<str> },
}

/// Runs one reconciliation pass: compare the desired IP against what the
/// chosen authority reports for `domain`, and issue the minimal remote
/// mutations. A replacement is remove-then-add; the provider has no in-place
/// edit, so there is a brief window with no record for the name.
///
/// `state` is read and updated only under the cache policy. Persisting it
/// afterwards is the caller's job.
pub fn reconcile(
    provider: &dyn DnsProvider,
    state: &mut DnsState,
    policy: UpdatePolicy,
    domain: &str,
    ip: &str,
) -> Result<Outcome, ProviderError> {
    let ip = ip.trim();

    match policy {
        UpdatePolicy::Remote => reconcile_remote(provider, domain, ip),
        UpdatePolicy::Cache => reconcile_cached(provider, state, domain, ip),
    }
}

fn reconcile_remote(
    provider: &dyn DnsProvider,
    domain: &str,
    ip: &str,
) -> Result<Outcome, ProviderError> {
    let Some(record) = provider.list_record(domain)? else {
        provider.add_record(domain, ip)?;
        return Ok(Outcome::Created { ip: ip.into() });
    };

    if record.value.trim() == ip {
        return Ok(Outcome::Unchanged { ip: ip.into() });
    }

    let from = record.value.clone();
    provider.remove_record(&record)?;
    provider.add_record(domain, ip)?;

    Ok(Outcome::Updated {
        from,
        to: ip.into(),
    })
}

fn reconcile_cached(
    provider: &dyn DnsProvider,
    state: &mut DnsState,
    domain: &str,
    ip: &str,
) -> Result<Outcome, ProviderError> {
    match state.get(domain).cloned() {
        Some(last) if &*last == ip => Ok(Outcome::Unchanged { ip: ip.into() }),

        Some(last) => {
            replace_record(provider, domain, ip)?;
            state.insert(domain.into(), ip.into());

            Ok(Outcome::Updated {
                from: last,
                to: ip.into(),
            })
        }

        // First run, or the cache file went missing. The remote record may
        // still exist, so check and clear it before adding: the name must
        // stay single-valued.
        None => {
            replace_record(provider, domain, ip)?;
            state.insert(domain.into(), ip.into());

            Ok(Outcome::Created { ip: ip.into() })
        }
    }
}

fn replace_record(
    provider: &dyn DnsProvider,
    domain: &str,
    ip: &str,
) -> Result<(), ProviderError> {
    if let Some(record) = provider.list_record(domain)? {
        provider.remove_record(&record)?;
    }

    provider.add_record(domain, ip)
}
