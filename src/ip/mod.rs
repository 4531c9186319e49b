mod exec;
mod http;

use thiserror::Error;

use crate::config::{LookupConfig, LookupMethod};

#[derive(Debug, Error, Clone)]
pub enum LookupError {
    #[error("unable to obtain an IP from the resolver command: {0}")]
    Exec(Box<str>),

    #[error("unable to obtain an IP over HTTP: {0}")]
    Http(Box<str>),

    #[error("the lookup returned an empty answer")]
    Empty,
}

/// Discovers the caller's apparent public IP address using the configured
/// lookup method. The answer is returned trimmed but otherwise untouched;
/// whatever literal the lookup produced is what gets pushed to the provider.
pub fn resolve(config: &LookupConfig, user_agent: &str) -> Result<Box<str>, LookupError> {
    let text = match &config.method {
        LookupMethod::Dig { hostname, resolver } => {
            exec::dig_short(hostname, resolver, config.version)?
        }

        LookupMethod::Http { url } => http::fetch_address(url, user_agent)?,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LookupError::Empty);
    }

    Ok(trimmed.into())
}
