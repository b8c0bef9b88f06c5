//! Utility functions

use std::net::IpAddr;
use std::path::Path;

use crate::errors::{MwqueryError, Result};

/// Check if a host is a literal IP address (bracketed IPv6 included).
///
/// # Examples
/// ```
/// use mwquery::utils::is_ip_address;
/// assert!(is_ip_address("127.0.0.1"));
/// assert!(is_ip_address("[::1]"));
/// assert!(!is_ip_address("example.com"));
/// ```
pub fn is_ip_address(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// Split a `Name: value` header argument at its first colon.
///
/// # Examples
/// ```
/// use mwquery::utils::parse_header_arg;
/// let (name, value) = parse_header_arg("Accept-API-Version: resource=2.0, protocol=1.0").unwrap();
/// assert_eq!(name, "Accept-API-Version");
/// assert_eq!(value, "resource=2.0, protocol=1.0");
/// ```
pub fn parse_header_arg(item: &str) -> Result<(&str, &str)> {
    let (name, value) = item
        .split_once(':')
        .ok_or_else(|| MwqueryError::InvalidHeader(format!("'{}' is not formatted as 'Name: value'", item)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(MwqueryError::InvalidHeader(format!("'{}' has an empty header name", item)));
    }
    Ok((name, value.trim()))
}

/// Resolve a `--data` argument: `@path` loads the file as UTF-8, anything
/// else is used verbatim.
pub fn load_data_arg(data: &str) -> Result<String> {
    match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path)).map_err(|e| {
            MwqueryError::Io(std::io::Error::new(
                e.kind(),
                format!("data file {}: {}", path, e),
            ))
        }),
        None => Ok(data.to_string()),
    }
}
