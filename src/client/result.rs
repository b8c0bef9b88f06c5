//! Normalized outcome of one HTTP exchange

use std::fmt;
use std::path::PathBuf;

use mime::Mime;

use crate::errors::Result;
use crate::mime::parse_content_type;

/// Which side of the exchange a cookie file operation belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieOp {
    /// Loading the file before the request
    Load,
    /// Writing the file after the response
    Save,
}

/// A cookie persistence failure that did not stop the call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWarning {
    pub op: CookieOp,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for CookieWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            CookieOp::Load => "load",
            CookieOp::Save => "save",
        };
        write!(f, "could not {} cookies ({}): {}", op, self.path.display(), self.message)
    }
}

/// Status, headers and body of a completed exchange.
///
/// 4xx and 5xx responses are ordinary results with `is_success() == false`.
#[derive(Debug, Clone)]
pub struct HttpResult {
    status: u16,
    success: bool,
    headers: Vec<(String, String)>,
    body: String,
    content_type: Option<Mime>,
    warnings: Vec<CookieWarning>,
}

impl HttpResult {
    /// Build a result; the body is trimmed and Content-Type parsed.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: &str) -> Self {
        let content_type = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, value)| parse_content_type(value));

        Self {
            status,
            success: (200..300).contains(&status),
            headers,
            body: body.trim().to_string(),
            content_type,
            warnings: Vec::new(),
        }
    }

    /// Build a HEAD result whose body lists the response headers as
    /// `name="value"` lines, names sorted case-insensitively. A repeated
    /// header contributes one line holding its last value.
    pub fn from_head(status: u16, headers: Vec<(String, String)>) -> Self {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &headers {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name);
            }
        }
        names.sort_by_cached_key(|name| name.to_ascii_lowercase());
        let dump = names
            .iter()
            .filter_map(|name| {
                headers
                    .iter()
                    .rev()
                    .find(|(n, _)| n.eq_ignore_ascii_case(name))
                    .map(|(n, v)| format!("{}=\"{}\"", n, v))
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self::new(status, headers, &dump)
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<CookieWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `None` if the response had no (valid) Content-Type
    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    pub fn warnings(&self) -> &[CookieWarning] {
        &self.warnings
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl fmt::Display for HttpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(n, v)| format!("{}: {}", n, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "Result [code={}, success={}, contentType={}, headers=[{}], data={}]",
            self.status,
            self.success,
            self.content_type
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "none".to_string()),
            headers,
            self.body
        )
    }
}
