use std::path::PathBuf;

use clap::Parser;

use crate::reconcile::UpdatePolicy;

/// Keep a DreamHost-hosted DNS "A" record pointed at this machine's public
/// IP address. One invocation performs one reconciliation pass and exits.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Resolve and print the external IP address, then exit
    #[arg(long)]
    pub get_ip: bool,

    /// Full domain name to update, e.g. `abc.onetwothree.com`, where
    /// `onetwothree.com` DNS is controlled by DreamHost
    #[arg(long)]
    pub domain: Option<String>,

    /// IP to use for the update (if omitted, the external IP is resolved)
    #[arg(long)]
    pub ip: Option<String>,

    /// DreamHost API key with DNS permissions; falls back to $APIKEY
    #[arg(long)]
    pub apikey: Option<String>,

    /// File holding the last-applied DNS state, created on first write
    /// (cache policy only)
    #[arg(long, value_name = "PATH")]
    pub dns_file: Option<String>,

    /// Comparison policy: `remote` re-checks the live record every run,
    /// `cache` trusts the local state file
    #[arg(long, value_enum)]
    pub policy: Option<UpdatePolicy>,

    /// Configuration file to read instead of the default locations
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
