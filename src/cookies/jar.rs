//! Host-keyed cookie jar with JSON file persistence
//!
//! The jar is what reqwest consults for every exchange (see the
//! [`CookieStore`] impl): cookies set by a response replace everything
//! previously stored for that host, and all stored cookies for the host are
//! sent back on the next request.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use dashmap::DashMap;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

use crate::cookies::record::{current_time_millis, CookieRecord};
use crate::errors::{MwqueryError, Result};

/// On-disk shape: host -> cookies, hosts in sorted order
type CookieFile = BTreeMap<String, Vec<CookieRecord>>;

#[derive(Debug, Default)]
pub struct CookieJar {
    store: DashMap<String, Vec<CookieRecord>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cookies stored for `host`.
    pub fn save_from_response(&self, host: &str, cookies: Vec<CookieRecord>) {
        self.store.insert(host.to_string(), cookies);
    }

    /// Cookies stored for `host`, or an empty list.
    pub fn load_for_request(&self, host: &str) -> Vec<CookieRecord> {
        self.store
            .get(host)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Hosts with stored cookies, sorted
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.store.iter().map(|e| e.key().clone()).collect();
        hosts.sort();
        hosts
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn snapshot(&self) -> CookieFile {
        self.store
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Write the whole jar to `path` as pretty-printed JSON.
    ///
    /// Uses atomic write (write to temp file, then rename) so a failure
    /// leaves any previous file untouched.
    pub fn serialize(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to create directory: {}", e)))?;

        let content = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to serialize: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to create temp file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to write: {}", e)))?;
        temp.persist(path)
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to save: {}", e)))?;

        // Cookie files hold session credentials
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
        }

        debug!(path = %path.display(), hosts = self.store.len(), "Cookie file written");
        Ok(())
    }

    /// Merge the cookies in `path` into the jar.
    ///
    /// A record is added only if an identical record is not already stored
    /// for its host; nothing in memory is ever removed. Returns the number of
    /// records added.
    pub fn deserialize(&self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to read: {}", e)))?;
        let file: CookieFile = serde_json::from_str(&content)
            .map_err(|e| MwqueryError::cookie_file(path, format!("failed to parse: {}", e)))?;

        let mut added = 0;
        for (host, records) in file {
            let mut list = self.store.entry(host).or_default();
            for record in records {
                if !list.contains(&record) {
                    list.push(record);
                    added += 1;
                }
            }
        }

        debug!(path = %path.display(), added, "Cookie file loaded");
        Ok(added)
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = url.host_str() else {
            return;
        };
        let now = current_time_millis();
        let cookies: Vec<CookieRecord> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| CookieRecord::parse_at(value, url, now))
            .collect();

        if cookies.is_empty() {
            return;
        }
        debug!(host, count = cookies.len(), "Storing response cookies");
        self.save_from_response(host, cookies);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?;
        let cookies = self.load_for_request(host);
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(CookieRecord::header_pair)
            .collect::<Vec<_>>()
            .join("; ");
        match HeaderValue::from_str(&header) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(host, count = cookies.len(), error = %e, "Stored cookies are not a valid Cookie header; none sent");
                None
            }
        }
    }
}
