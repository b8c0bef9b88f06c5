//! Cookie records and Set-Cookie parsing

use cookie::Cookie;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::is_ip_address;

/// Expiry given to session cookies: 9999-12-31T23:59:59.999Z in epoch ms.
pub const MAX_DATE: i64 = 253_402_300_799_999;

/// One stored cookie. Two records are the same cookie only when every
/// field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Epoch milliseconds
    pub expires_at: i64,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub persistent: bool,
}

impl CookieRecord {
    /// Parse one Set-Cookie header value received from `url`.
    pub fn parse(set_cookie: &str, url: &Url) -> Option<Self> {
        Self::parse_at(set_cookie, url, current_time_millis())
    }

    /// Parse with an explicit clock.
    ///
    /// Returns `None` for unparseable headers and for cookies whose Domain
    /// attribute does not cover the request host.
    pub fn parse_at(set_cookie: &str, url: &Url, now_ms: i64) -> Option<Self> {
        let host = url.host_str()?;
        let cookie = Cookie::parse(set_cookie).ok()?;
        if cookie.name().is_empty() {
            return None;
        }

        // Max-Age wins over Expires
        let max_age_secs = cookie.max_age().map(|d| d.whole_seconds());
        let expires_secs = cookie.expires_datetime().map(|dt| dt.unix_timestamp());
        let (expires_at, persistent) = match (max_age_secs, expires_secs) {
            (Some(delta), _) if delta <= 0 => (i64::MIN, true),
            (Some(delta), _) => (
                now_ms.saturating_add(delta.saturating_mul(1000)).min(MAX_DATE),
                true,
            ),
            (None, Some(secs)) => (secs.saturating_mul(1000).min(MAX_DATE), true),
            (None, None) => (MAX_DATE, false),
        };

        let (domain, host_only) = match cookie.domain().map(|d| d.trim_start_matches('.')) {
            Some(d) if !d.is_empty() => {
                let d = d.to_ascii_lowercase();
                if !domain_matches(host, &d) {
                    return None;
                }
                (d, false)
            }
            _ => (host.to_string(), true),
        };

        let path = match cookie.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url),
        };

        Some(Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            expires_at,
            domain,
            path,
            secure: cookie.secure().unwrap_or(false),
            http_only: cookie.http_only().unwrap_or(false),
            host_only,
            persistent,
        })
    }

    /// `name=value` as sent in a Cookie request header
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }
}

/// Get current Unix time in milliseconds
pub fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Check if a request host falls under a cookie domain.
///
/// Handles the leading dot in cookie domains per RFC 6265.
/// Example: "api.example.com" matches ".example.com"
pub fn domain_matches(request_host: &str, cookie_domain: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.');

    request_host == cookie_domain
        || (request_host.ends_with(&format!(".{}", cookie_domain)) && !is_ip_address(request_host))
}

/// RFC 6265 default-path: the request path up to, not including, its last `/`.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_session_cookie_defaults() {
        let c = CookieRecord::parse_at("sid=abc", &url("https://sso.example.com/auth/login"), NOW).unwrap();
        assert_eq!(c.name, "sid");
        assert_eq!(c.value, "abc");
        assert_eq!(c.domain, "sso.example.com");
        assert!(c.host_only);
        assert_eq!(c.path, "/auth");
        assert!(!c.persistent);
        assert_eq!(c.expires_at, MAX_DATE);
        assert!(!c.secure);
        assert!(!c.http_only);
    }

    #[test]
    fn test_attributes() {
        let c = CookieRecord::parse_at(
            "amlbcookie=01; Domain=.example.com; Path=/; Max-Age=60; Secure; HttpOnly",
            &url("https://sso.example.com/"),
            NOW,
        )
        .unwrap();
        assert_eq!(c.domain, "example.com");
        assert!(!c.host_only);
        assert_eq!(c.path, "/");
        assert!(c.persistent);
        assert_eq!(c.expires_at, NOW + 60_000);
        assert!(c.secure);
        assert!(c.http_only);
    }

    #[test]
    fn test_expires_attribute() {
        let c = CookieRecord::parse_at(
            "a=b; Expires=Sun, 06 Nov 1994 08:49:37 GMT",
            &url("http://example.com/"),
            NOW,
        )
        .unwrap();
        assert!(c.persistent);
        assert_eq!(c.expires_at, 784_111_777_000);
        assert!(c.is_expired_at(NOW));
    }

    #[test]
    fn test_zero_max_age_is_expired() {
        let c = CookieRecord::parse_at("a=; Max-Age=0", &url("http://example.com/"), NOW).unwrap();
        assert_eq!(c.expires_at, i64::MIN);
        assert!(c.is_expired_at(NOW));
    }

    #[test]
    fn test_foreign_domain_is_rejected() {
        assert!(CookieRecord::parse_at("a=b; Domain=other.com", &url("http://example.com/"), NOW).is_none());
        assert!(CookieRecord::parse_at("not a cookie", &url("http://example.com/"), NOW).is_none());
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("api.example.com", ".example.com"));
        assert!(domain_matches("example.com", "example.com"));
        assert!(!domain_matches("badexample.com", "example.com"));
        assert!(!domain_matches("10.0.0.1", "0.0.1"));
    }

    #[test]
    fn test_serialized_field_names() {
        let c = CookieRecord::parse_at("sid=abc", &url("http://example.com/"), NOW).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["name", "value", "expiresAt", "domain", "path", "secure", "httpOnly", "hostOnly", "persistent"]
        );
    }
}
