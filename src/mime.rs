//! Request media types and Content-Type parsing

use clap::ValueEnum;
use mime::Mime;
use std::fmt;

/// Request body type for POST and PUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "UPPERCASE")]
pub enum MediaType {
    /// JSON body (application/json)
    #[default]
    Json,
    /// Form body (application/x-www-form-urlencoded)
    #[value(name = "URLENCODED")]
    UrlEncoded,
}

impl MediaType {
    /// Content-Type header value sent with the body
    pub fn content_type(self) -> &'static str {
        match self {
            MediaType::Json => "application/json; charset=utf-8",
            MediaType::UrlEncoded => "application/x-www-form-urlencoded; charset=utf-8",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Json => write!(f, "JSON"),
            MediaType::UrlEncoded => write!(f, "URLENCODED"),
        }
    }
}

/// Parse a Content-Type header value. Returns `None` when it is not a valid
/// MIME type.
///
/// # Examples
/// ```
/// use mwquery::mime::parse_content_type;
/// let mime = parse_content_type("application/json; charset=utf-8").unwrap();
/// assert_eq!(mime.essence_str(), "application/json");
/// assert_eq!(mime.get_param("charset").unwrap(), "utf-8");
/// ```
pub fn parse_content_type(header: &str) -> Option<Mime> {
    header.trim().parse::<Mime>().ok()
}

/// Whether a MIME type carries JSON (`application/json`, `application/*+json`)
pub fn is_json(mime: &Mime) -> bool {
    mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}
