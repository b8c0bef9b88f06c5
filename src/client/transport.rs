//! The network side of an exchange
//!
//! [`HttpClient`](super::HttpClient) drives a [`Transport`]; the production
//! transport is reqwest with the client's [`CookieJar`] installed as its
//! cookie provider, so response cookies reach the jar through reqwest's own
//! cookie hook.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use url::Url;

use crate::cookies::CookieJar;
use crate::errors::Result;

pub const USER_AGENT_STRING: &str = concat!("mwquery/", env!("CARGO_PKG_VERSION"));

/// A fully prepared request
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: Method,
    pub url: Url,
    /// Caller headers, Content-Type already set when there is a body
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// What came back, before normalization into an [`HttpResult`](super::HttpResult)
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    /// Header names in received order; a name repeats once per value
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes one exchange.
///
/// Implementations must feed response cookies to the jar they were built
/// with, and attach that jar's cookies to the outgoing request.
pub trait Transport: Send + Sync {
    fn execute(&self, exchange: Exchange) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(jar: Arc<CookieJar>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT_STRING)
            .cookie_provider(jar)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, exchange: Exchange) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(exchange.method, exchange.url)
            .headers(exchange.headers);
        if let Some(body) = exchange.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
