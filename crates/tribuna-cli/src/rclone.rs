//! Extracts Google Drive credentials from an rclone config, so CI can
//! manage the segment folder without shipping the whole config.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// What the `rclone-env` command prints.
#[derive(Debug, Serialize, PartialEq)]
pub struct DriveCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// rclone stores the OAuth token as a JSON blob inside the config value.
#[derive(Deserialize)]
struct StoredToken {
    refresh_token: String,
}

/// Decode a base64 rclone config and pull the named remote's credentials
/// out of it.
pub fn credentials_from_base64(encoded: &str, remote: &str) -> Result<DriveCredentials, PipelineError> {
    let decoded = STANDARD.decode(encoded.trim())?;
    let conf = String::from_utf8(decoded)?;
    credentials_from_conf(&conf, remote)
}

fn credentials_from_conf(conf: &str, remote: &str) -> Result<DriveCredentials, PipelineError> {
    let section = remote_section(conf, remote)?;
    let key = |name: &str| {
        section
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::MissingKey {
                remote: remote.to_string(),
                key: name.to_string(),
            })
    };

    let token: StoredToken =
        serde_json::from_str(&key("token")?).map_err(|source| PipelineError::ParseCommand {
            command: format!("[{remote}] token"),
            source,
        })?;

    Ok(DriveCredentials {
        client_id: key("client_id")?,
        client_secret: key("client_secret")?,
        refresh_token: token.refresh_token,
    })
}

/// Minimal INI scanner, enough for the `key = value` lines rclone writes.
fn remote_section(conf: &str, remote: &str) -> Result<HashMap<String, String>, PipelineError> {
    let mut section = HashMap::new();
    let mut in_remote = false;
    let mut found = false;

    for line in conf.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            in_remote = name.trim() == remote;
            found |= in_remote;
            continue;
        }

        if !in_remote {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            section.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    if !found {
        return Err(PipelineError::MissingRemote {
            remote: remote.to_string(),
        });
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "\
        # rclone.conf\n\
        [other]\n\
        type = local\n\
        \n\
        [debates]\n\
        type = drive\n\
        client_id = 12345.apps.googleusercontent.com\n\
        client_secret = s3cr3t\n\
        token = {\"access_token\":\"ya29.a0\",\"token_type\":\"Bearer\",\"refresh_token\":\"1//refresh\",\"expiry\":\"2024-03-01T00:00:00Z\"}\n";

    #[test]
    fn extracts_the_remote_credentials() {
        let credentials = credentials_from_conf(CONF, "debates").unwrap();

        assert_eq!(
            credentials,
            DriveCredentials {
                client_id: "12345.apps.googleusercontent.com".to_string(),
                client_secret: "s3cr3t".to_string(),
                refresh_token: "1//refresh".to_string(),
            }
        );
    }

    #[test]
    fn decodes_a_base64_config() {
        let encoded = STANDARD.encode(CONF);

        let credentials = credentials_from_base64(&encoded, "debates").unwrap();

        assert_eq!(credentials.refresh_token, "1//refresh");
    }

    #[test]
    fn unknown_remotes_are_an_error() {
        let result = credentials_from_conf(CONF, "missing");
        assert!(matches!(
            result,
            Err(PipelineError::MissingRemote { remote }) if remote == "missing"
        ));
    }

    #[test]
    fn missing_keys_are_an_error() {
        let conf = "[debates]\nclient_id = 12345\n";

        let result = credentials_from_conf(conf, "debates");
        assert!(matches!(
            result,
            Err(PipelineError::MissingKey { key, .. }) if key == "token"
        ));
    }
}
