//! OAuth properties file loading
//!
//! The file holds one `key=value` (or `key: value`) pair per line. Lines
//! starting with `#` or `!` are comments.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::{MwqueryError, Result};
use crate::oauth::signer::Credentials;

pub const KEY_CONSUMER_KEY: &str = "consumer_key";
pub const KEY_CONSUMER_SECRET: &str = "consumer_secret";
pub const KEY_TOKEN: &str = "token";
pub const KEY_TOKEN_SECRET: &str = "token_secret";

/// Load credentials from a properties file.
///
/// Every one of `consumer_key`, `consumer_secret`, `token` and
/// `token_secret` must be present and non-empty.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MwqueryError::Config(format!("Failed to read OAuth config {}: {}", path.display(), e))
    })?;
    credentials_from_properties(&parse_properties(&content))
}

/// Parse properties text into a key/value map. Later keys replace earlier ones.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let idx = line.find(['=', ':'])?;
            let (key, value) = (&line[..idx], &line[idx + 1..]);
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn credentials_from_properties(props: &HashMap<String, String>) -> Result<Credentials> {
    let get = |key: &str| -> Result<String> {
        props
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| MwqueryError::Config(format!("OAuth config is missing required key '{}'", key)))
    };

    Ok(Credentials {
        consumer_key: get(KEY_CONSUMER_KEY)?,
        consumer_secret: get(KEY_CONSUMER_SECRET)?,
        token: get(KEY_TOKEN)?,
        token_secret: get(KEY_TOKEN_SECRET)?,
    })
}
