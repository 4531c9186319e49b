mod cli;
mod config;
mod http;
mod ip;
mod provider;
mod reconcile;
mod state;
mod util;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use cli::Args;
use config::Config;
use provider::dreamhost::DreamhostClient;
use reconcile::{Outcome, UpdatePolicy};
use state::DnsState;

fn main() -> ExitCode {
    let args = Args::parse();

    let file = match config::load_file(args.config.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            println!("{} [ERROR] {}", util::timestamp(), e);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::resolve(args, std::env::var("APIKEY").ok(), file);
    run(&config)
}

fn run(config: &Config) -> ExitCode {
    if config.get_ip {
        return match ip::resolve(&config.lookup, &config.user_agent) {
            Ok(ip) => {
                println!("{} {}", util::timestamp(), ip);
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!(
                    "{} [ERROR] unable to resolve the external IP: {}",
                    util::timestamp(),
                    e
                );
                ExitCode::FAILURE
            }
        };
    }

    let Some(domain) = config.domain.as_deref() else {
        println!("{} no domain to update", util::timestamp());
        return ExitCode::SUCCESS;
    };

    // Checked before anything touches the network.
    let Some(api_key) = config.api_key.as_deref() else {
        println!(
            "{} [ERROR] no API key provided (use --apikey or the APIKEY environment variable)",
            util::timestamp()
        );
        return ExitCode::FAILURE;
    };

    let desired_ip = match config.explicit_ip.clone() {
        Some(ip) => ip,
        None => match ip::resolve(&config.lookup, &config.user_agent) {
            Ok(ip) => ip,
            Err(e) => {
                println!(
                    "{} [ERROR] unable to resolve the external IP: {}",
                    util::timestamp(),
                    e
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let client = DreamhostClient::new(api_key, &config.user_agent);

    let state_path = Path::new(config.dns_file.as_ref());
    let mut dns_state = match config.policy {
        UpdatePolicy::Cache => state::load_or_default(state_path),
        UpdatePolicy::Remote => DnsState::new(),
    };

    let outcome = match reconcile::reconcile(
        &client,
        &mut dns_state,
        config.policy,
        domain,
        &desired_ip,
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{} [ERROR] DreamHost API failure: {}", util::timestamp(), e);
            return ExitCode::FAILURE;
        }
    };

    match &outcome {
        Outcome::Unchanged { ip } => {
            println!(
                "{} nothing to update. {} is set to {}",
                util::timestamp(),
                domain,
                ip
            );
        }

        Outcome::Created { ip } => {
            println!(
                "{} DNS record for {} did not exist, set to {}",
                util::timestamp(),
                domain,
                ip
            );
        }

        Outcome::Updated { from, to } => {
            println!(
                "{} updated record {} from {} to {}",
                util::timestamp(),
                domain,
                from,
                to
            );
        }
    }

    // The remote side is already updated at this point, so a state file that
    // fails to write costs one redundant replace next run, nothing more.
    if config.policy == UpdatePolicy::Cache && !matches!(outcome, Outcome::Unchanged { .. }) {
        if let Err(e) = state::save(state_path, &dns_state) {
            println!(
                "{} [WARN] couldn't write the DNS state file {}: {}",
                util::timestamp(),
                state_path.display(),
                e
            );
        }
    }

    ExitCode::SUCCESS
}
