use std::process::Command;

use crate::config::IpVersion;

use super::LookupError;

/// Runs `dig +short <hostname> <A|AAAA> @<resolver>`, pinned to the matching
/// IP transport so the resolver answers over the address family we are
/// asking about.
pub(super) fn dig_short(
    hostname: &str,
    resolver: &str,
    version: IpVersion,
) -> Result<String, LookupError> {
    let mut command = Command::new("dig");
    command.arg("+short");

    let record_type = match version {
        IpVersion::V4 => {
            command.arg("-4");
            "A"
        }
        IpVersion::V6 => {
            command.arg("-6");
            "AAAA"
        }
    };

    let output = command
        .arg(hostname)
        .arg(record_type)
        .arg(String::from("@") + resolver)
        .output()
        .map_err(|e| LookupError::Exec(e.to_string().into()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = format!("dig exited with {}: {}", output.status, stderr.trim());
        return Err(LookupError::Exec(reason.into()));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| LookupError::Exec("got gibberish from the resolver process".into()))
}
