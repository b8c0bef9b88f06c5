//! HttpClient: the four verbs, each wrapped in cookie load/save
//!
//! Every call holds one client-wide lock across the whole
//! load-cookies / exchange / save-cookies sequence, so a client instance has
//! at most one request in flight and the cookie file always reflects a jar
//! state reached after the last completed call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::result::{CookieOp, CookieWarning, HttpResult};
use crate::client::transport::{Exchange, ReqwestTransport, Transport};
use crate::cookies::{CookieJar, CookieRecord};
use crate::errors::Result;
use crate::mime::MediaType;

/// The jar is owned by the client and the transport it builds; callers only
/// read it through [`HttpClient::cookies_for`] and [`HttpClient::cookie_hosts`],
/// which wait for the lock like any request.
pub struct HttpClient<T: Transport = ReqwestTransport> {
    transport: T,
    jar: Arc<CookieJar>,
    cookie_path: Option<PathBuf>,
    lock: Mutex<()>,
}

impl HttpClient<ReqwestTransport> {
    /// Client over reqwest with a fresh jar; `cookie_path` enables
    /// persistence.
    pub fn new(cookie_path: Option<PathBuf>) -> Result<Self> {
        let jar = Arc::new(CookieJar::new());
        let transport = ReqwestTransport::new(Arc::clone(&jar))?;
        Ok(Self::from_parts(transport, jar, cookie_path))
    }
}

impl<T: Transport> HttpClient<T> {
    /// Create the client's jar and hand it to `build`, which wires it into
    /// the transport.
    pub fn with_transport<F>(build: F, cookie_path: Option<PathBuf>) -> Self
    where
        F: FnOnce(Arc<CookieJar>) -> T,
    {
        let jar = Arc::new(CookieJar::new());
        let transport = build(Arc::clone(&jar));
        Self::from_parts(transport, jar, cookie_path)
    }

    fn from_parts(transport: T, jar: Arc<CookieJar>, cookie_path: Option<PathBuf>) -> Self {
        Self {
            transport,
            jar,
            cookie_path,
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Cookies held for `host`, read once no request is in flight
    pub async fn cookies_for(&self, host: &str) -> Vec<CookieRecord> {
        let _guard = self.lock.lock().await;
        self.jar.load_for_request(host)
    }

    /// Hosts with stored cookies, read once no request is in flight
    pub async fn cookie_hosts(&self) -> Vec<String> {
        let _guard = self.lock.lock().await;
        self.jar.hosts()
    }

    pub fn cookie_path(&self) -> Option<&Path> {
        self.cookie_path.as_deref()
    }

    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<HttpResult> {
        self.execute(Method::GET, url, headers, None).await
    }

    /// The result body is the response headers as `name="value"` lines.
    pub async fn head(&self, url: &str, headers: HeaderMap) -> Result<HttpResult> {
        self.execute(Method::HEAD, url, headers, None).await
    }

    pub async fn post(
        &self,
        media_type: MediaType,
        url: &str,
        headers: HeaderMap,
        body: &str,
    ) -> Result<HttpResult> {
        self.execute(Method::POST, url, headers, Some((media_type, body)))
            .await
    }

    pub async fn put(
        &self,
        media_type: MediaType,
        url: &str,
        headers: HeaderMap,
        body: &str,
    ) -> Result<HttpResult> {
        self.execute(Method::PUT, url, headers, Some((media_type, body)))
            .await
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        mut headers: HeaderMap,
        body: Option<(MediaType, &str)>,
    ) -> Result<HttpResult> {
        let url = Url::parse(url)?;
        let body = body.map(|(media_type, content)| {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(media_type.content_type()));
            content.to_string()
        });

        let _guard = self.lock.lock().await;
        let mut warnings = Vec::new();

        if let Some(path) = self.cookie_path.as_deref() {
            if path.exists() {
                if let Err(e) = self.jar.deserialize(path) {
                    warn!(path = %path.display(), error = %e, "Could not load cookies");
                    warnings.push(cookie_warning(CookieOp::Load, path, &e));
                }
            }
        }

        debug!(method = %method, url = %url, "Sending request");
        let is_head = method == Method::HEAD;
        let response = self
            .transport
            .execute(Exchange {
                method,
                url,
                headers,
                body,
            })
            .await?;
        debug!(status = response.status, "Response received");

        let result = if is_head {
            HttpResult::from_head(response.status, response.headers)
        } else {
            HttpResult::new(response.status, response.headers, &response.body)
        };

        if let Some(path) = self.cookie_path.as_deref() {
            match self.jar.serialize(path) {
                Ok(()) => info!(path = %path.display(), "Cookies synced"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not save cookies");
                    warnings.push(cookie_warning(CookieOp::Save, path, &e));
                }
            }
        }

        Ok(result.with_warnings(warnings))
    }
}

fn cookie_warning(op: CookieOp, path: &Path, error: &crate::errors::MwqueryError) -> CookieWarning {
    CookieWarning {
        op,
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
