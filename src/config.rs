use std::fs;
use std::path::Path;

use serde_derive::Deserialize;
use serde_repr::Deserialize_repr;
use thiserror::Error;

use crate::cli::Args;
use crate::reconcile::UpdatePolicy;

/// Default locations probed when no --config flag is given. Missing files are
/// skipped; the first one that opens wins.
pub const CONFIG_PATHS: [&str; 2] = [
    "./dreamdns.toml",
    #[cfg(target_family = "unix")]
    "/etc/dreamdns/config.toml",
];

#[derive(Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IpVersion {
    V4 = 4,
    V6 = 6,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "method")]
#[serde(rename_all = "lowercase")]
pub enum LookupMethod {
    /// Ask a public resolver for the special hostname that mirrors back the
    /// querying client's address, via a `dig` subprocess.
    Dig {
        #[serde(default = "default_lookup_hostname")]
        hostname: Box<str>,

        #[serde(default = "default_lookup_resolver")]
        resolver: Box<str>,
    },

    /// GET a plain-text "what is my IP" service.
    Http { url: Box<str> },
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LookupConfig {
    #[serde(default = "default_ip_version")]
    pub version: IpVersion,

    #[serde(flatten)]
    pub method: LookupMethod,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            version: IpVersion::V4,
            method: LookupMethod::Dig {
                hostname: default_lookup_hostname(),
                resolver: default_lookup_resolver(),
            },
        }
    }
}

/// The `[general]` section of the config file. Everything is optional here;
/// resolution against flags, environment and defaults happens in
/// `Config::resolve`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneralSection {
    pub domain: Option<Box<str>>,
    pub api_key: Option<Box<str>>,
    pub policy: Option<UpdatePolicy>,
    pub dns_file: Option<Box<str>>,
    pub user_agent: Option<Box<str>>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub general: GeneralSection,

    pub lookup: Option<LookupConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {0}: {1}")]
    Unreadable(Box<str>, Box<str>),

    #[error("config file {0} is not valid TOML: {1}")]
    Invalid(Box<str>, Box<str>),
}

/// Loads the config file named by --config, or probes CONFIG_PATHS. With an
/// explicit path every failure is an error; for the probed defaults a file
/// that cannot be opened is simply skipped.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path).map_err(|e| {
            ConfigError::Unreadable(path.display().to_string().into(), e.to_string().into())
        })?;

        return parse(path, &text);
    }

    for path in CONFIG_PATHS {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(_) => continue,
        };

        return parse(Path::new(path), &text);
    }

    Ok(FileConfig::default())
}

fn parse(path: &Path, text: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(text).map_err(|e| {
        ConfigError::Invalid(path.display().to_string().into(), e.to_string().into())
    })
}

/// The one configuration record for a run, built in main() and passed by
/// reference from there on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub get_ip: bool,
    pub domain: Option<Box<str>>,
    pub explicit_ip: Option<Box<str>>,
    pub api_key: Option<Box<str>>,
    pub policy: UpdatePolicy,
    pub dns_file: Box<str>,
    pub user_agent: Box<str>,
    pub lookup: LookupConfig,
}

impl Config {
    /// Merge order, highest precedence first: command-line flags, the APIKEY
    /// environment variable (key only), the config file, built-in defaults.
    pub fn resolve(args: Args, env_api_key: Option<String>, file: FileConfig) -> Self {
        Self {
            get_ip: args.get_ip,
            domain: args.domain.map(Into::into).or(file.general.domain),
            explicit_ip: args.ip.map(|ip| ip.trim().to_owned().into()),
            api_key: args
                .apikey
                .map(Into::into)
                .or(env_api_key.map(Into::into))
                .or(file.general.api_key),
            policy: args
                .policy
                .or(file.general.policy)
                .unwrap_or(UpdatePolicy::Cache),
            dns_file: args
                .dns_file
                .map(Into::into)
                .or(file.general.dns_file)
                .unwrap_or_else(|| "dns-record.txt".into()),
            user_agent: file
                .general
                .user_agent
                .unwrap_or_else(default_user_agent),
            lookup: file.lookup.unwrap_or_default(),
        }
    }
}

fn default_user_agent() -> Box<str> {
    concat!("github.com/dreamdns/dreamdns ", env!("CARGO_PKG_VERSION")).into()
}

fn default_lookup_hostname() -> Box<str> {
    "myip.opendns.com".into()
}

fn default_lookup_resolver() -> Box<str> {
    "resolver1.opendns.com".into()
}

fn default_ip_version() -> IpVersion {
    IpVersion::V4
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dreamdns").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn full_file_parses() {
        let text = r#"
            [general]
            domain = "host.example.com"
            api_key = "ABCDEF123456"
            policy = "remote"
            dns_file = "/var/lib/dreamdns/state.json"
            user_agent = "tester 0.0"

            [lookup]
            version = 6
            method = "http"
            url = "https://ifconfig.co"
        "#;

        let file = toml::from_str::<FileConfig>(text).unwrap();

        assert_eq!(file.general.domain.as_deref(), Some("host.example.com"));
        assert_eq!(file.general.policy, Some(UpdatePolicy::Remote));

        let lookup = file.lookup.unwrap();
        assert_eq!(lookup.version, IpVersion::V6);
        assert_eq!(
            lookup.method,
            LookupMethod::Http {
                url: "https://ifconfig.co".into()
            }
        );
    }

    #[test]
    fn dig_lookup_fills_in_the_opendns_defaults() {
        let text = r#"
            [lookup]
            version = 4
            method = "dig"
        "#;

        let file = toml::from_str::<FileConfig>(text).unwrap();

        assert_eq!(
            file.lookup.unwrap().method,
            LookupMethod::Dig {
                hostname: "myip.opendns.com".into(),
                resolver: "resolver1.opendns.com".into(),
            }
        );
    }

    #[test]
    fn empty_input_resolves_to_the_defaults() {
        let config = Config::resolve(args(&[]), None, FileConfig::default());

        assert_eq!(config.policy, UpdatePolicy::Cache);
        assert_eq!(&*config.dns_file, "dns-record.txt");
        assert_eq!(config.domain, None);
        assert_eq!(config.api_key, None);
        assert_eq!(config.lookup, LookupConfig::default());
    }

    #[test]
    fn flags_outrank_environment_and_file() {
        let mut file = FileConfig::default();
        file.general.api_key = Some("from-file".into());
        file.general.policy = Some(UpdatePolicy::Cache);

        let config = Config::resolve(
            args(&["--apikey", "from-flag", "--policy", "remote"]),
            Some(String::from("from-env")),
            file,
        );

        assert_eq!(config.api_key.as_deref(), Some("from-flag"));
        assert_eq!(config.policy, UpdatePolicy::Remote);
    }

    #[test]
    fn environment_outranks_the_file_for_the_api_key() {
        let mut file = FileConfig::default();
        file.general.api_key = Some("from-file".into());

        let config = Config::resolve(args(&[]), Some(String::from("from-env")), file);

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn explicit_ip_is_trimmed_on_the_way_in() {
        let config = Config::resolve(
            args(&["--ip", " 203.0.113.5 "]),
            None,
            FileConfig::default(),
        );

        assert_eq!(config.explicit_ip.as_deref(), Some("203.0.113.5"));
    }
}
