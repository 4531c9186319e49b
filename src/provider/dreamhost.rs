use serde_json::Value;

use crate::http::{Error, Request};
use crate::util;

use super::{DnsProvider, DnsRecord, ProviderError};

const API_URL: &str = "https://api.dreamhost.com/";

const CMD_LIST: &str = "dns-list_records";
const CMD_ADD: &str = "dns-add_record";
const CMD_REMOVE: &str = "dns-remove_record";

/// Client for the DreamHost HTTP API. Every operation is a GET whose query
/// string carries the command; responses are JSON with a `result` field that
/// must read "success".
///
/// See: https://help.dreamhost.com/hc/en-us/articles/217560167-API_overview
pub struct DreamhostClient {
    api_key: Box<str>,
    user_agent: Box<str>,
}

impl DreamhostClient {
    pub fn new(api_key: &str, user_agent: &str) -> Self {
        Self {
            api_key: api_key.into(),
            user_agent: user_agent.into(),
        }
    }

    fn request(
        &self,
        cmd: &'static str,
        params: &[(&str, &str)],
    ) -> Result<Value, ProviderError> {
        let mut request = Request::get(API_URL)
            .set("User-Agent", &self.user_agent)
            .query("key", &self.api_key)
            .query("format", "json")
            .query("cmd", cmd);

        for (param, value) in params {
            request = request.query(param, value);
        }

        // DreamHost reports failures inside the JSON body, so an HTTP error
        // status still carries a parseable response.
        let response = match request.call() {
            Ok(resp) | Err(Error::Status(_, resp)) => resp,
            Err(Error::Transport(tp)) => {
                return Err(ProviderError::Transport {
                    action: cmd,
                    reason: tp,
                })
            }
        };

        let json = response.into_json::<Value>().map_err(|e| ProviderError::Json {
            action: cmd,
            reason: e.to_string().into(),
        })?;

        check_result(json, cmd)
    }
}

/// Requires `result` to be "success", turning anything else into a rejection
/// carrying whatever message the provider put in `data`.
fn check_result(json: Value, action: &'static str) -> Result<Value, ProviderError> {
    let Some(result) = json.get("result").and_then(|v| v.as_str()) else {
        return Err(ProviderError::Json {
            action,
            reason: "response has no result field?".into(),
        });
    };

    if result != "success" {
        let message = json
            .get("data")
            .and_then(|v| v.as_str())
            .unwrap_or("(no message)");

        return Err(ProviderError::Rejected {
            action,
            message: message.into(),
        });
    }

    Ok(json)
}

/// Scans a `dns-list_records` data array for the first record whose name
/// equals `domain`, ignoring case.
fn find_record(records: &[Value], domain: &str) -> Result<Option<DnsRecord>, ProviderError> {
    for record in records {
        let Some(name) = record.get("record").and_then(|v| v.as_str()) else {
            return Err(ProviderError::Json {
                action: CMD_LIST,
                reason: "record has no name?".into(),
            });
        };

        if !name.eq_ignore_ascii_case(domain) {
            continue;
        }

        let Some(kind) = record.get("type").and_then(|v| v.as_str()) else {
            return Err(ProviderError::Json {
                action: CMD_LIST,
                reason: "record has no type?".into(),
            });
        };

        let Some(value) = record.get("value").and_then(|v| v.as_str()) else {
            return Err(ProviderError::Json {
                action: CMD_LIST,
                reason: "record has no value?".into(),
            });
        };

        let comment = record
            .get("comment")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        return Ok(Some(DnsRecord {
            record: name.into(),
            kind: kind.into(),
            value: value.into(),
            comment: comment.into(),
        }));
    }

    Ok(None)
}

fn autoupdate_comment() -> String {
    String::from("autoupdated on ") + &util::timestamp()
}

impl DnsProvider for DreamhostClient {
    fn list_record(&self, domain: &str) -> Result<Option<DnsRecord>, ProviderError> {
        let response = self.request(CMD_LIST, &[])?;

        let Some(records) = response.get("data").and_then(|v| v.as_array()) else {
            return Err(ProviderError::Json {
                action: CMD_LIST,
                reason: "response has no data array?".into(),
            });
        };

        find_record(records, domain)
    }

    fn add_record(&self, domain: &str, ip: &str) -> Result<(), ProviderError> {
        let record = domain.to_ascii_lowercase();
        let comment = autoupdate_comment();

        self.request(
            CMD_ADD,
            &[
                ("record", &record),
                ("type", "A"),
                ("value", ip),
                ("comment", &comment),
            ],
        )?;

        Ok(())
    }

    fn remove_record(&self, record: &DnsRecord) -> Result<(), ProviderError> {
        self.request(
            CMD_REMOVE,
            &[
                ("record", &record.record),
                ("type", &record.kind),
                ("value", &record.value),
            ],
        )?;

        Ok(())
    }
}
