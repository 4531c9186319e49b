use crate::http::{Error, Request};

use super::LookupError;

pub(super) fn fetch_address(url: &str, user_agent: &str) -> Result<String, LookupError> {
    let response = match Request::get(url).set("User-Agent", user_agent).call() {
        Ok(r) => r,
        Err(Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            let reason = format!("HTTP {}: {}", code, body.trim());
            return Err(LookupError::Http(reason.into()));
        }
        Err(Error::Transport(tp)) => return Err(LookupError::Http(tp)),
    };

    response
        .into_string()
        .map_err(|e| LookupError::Http(e.to_string().into()))
}
