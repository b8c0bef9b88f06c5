//! OAuth 1.0a HMAC-SHA1 request signing
//!
//! [`sign`] is a pure function of its [`SigningRequest`]: the only
//! non-determinism is the nonce and timestamp, and both can be pinned to
//! reproduce published test vectors.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;
use url::Url;

use crate::errors::{MwqueryError, Result};
use crate::oauth::encode::encode;

type HmacSha1 = Hmac<Sha1>;

pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

const OAUTH_HEADER: &str = "OAuth";
const OAUTH_PARAM_KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
const OAUTH_PARAM_KEY_NONCE: &str = "oauth_nonce";
const OAUTH_PARAM_KEY_SIGNATURE: &str = "oauth_signature";
const OAUTH_PARAM_KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
const OAUTH_PARAM_KEY_TIMESTAMP: &str = "oauth_timestamp";
const OAUTH_PARAM_KEY_TOKEN: &str = "oauth_token";
const OAUTH_PARAM_KEY_VERSION: &str = "oauth_version";

const NONCE_BYTES: usize = 32;

/// Consumer and access-token credentials for one signing call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("token", &self.token),
            ("token_secret", &self.token_secret),
        ];
        match fields.iter().find(|(_, v)| v.is_empty()) {
            Some((name, _)) => Err(MwqueryError::Signing(format!("missing credential '{}'", name))),
            None => Ok(()),
        }
    }
}

// Never print secrets, not even in debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .finish()
    }
}

/// Everything needed to sign one request.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    /// HTTP method; upper-cased in the base string
    pub method: &'a str,
    /// Full target URL, query string included
    pub url: &'a str,
    pub credentials: &'a Credentials,
    /// Raw `name=value` parameters (body fields, extras)
    pub extra_params: &'a [String],
    /// Fixed nonce, for reproducing test vectors only
    pub nonce: Option<&'a str>,
    /// Fixed epoch-seconds timestamp, for reproducing test vectors only
    pub timestamp: Option<&'a str>,
}

impl<'a> SigningRequest<'a> {
    pub fn new(method: &'a str, url: &'a str, credentials: &'a Credentials) -> Self {
        Self {
            method,
            url,
            credentials,
            extra_params: &[],
            nonce: None,
            timestamp: None,
        }
    }

    pub fn with_params(self, extra_params: &'a [String]) -> Self {
        Self { extra_params, ..self }
    }

    pub fn with_nonce(self, nonce: &'a str) -> Self {
        Self { nonce: Some(nonce), ..self }
    }

    pub fn with_timestamp(self, timestamp: &'a str) -> Self {
        Self { timestamp: Some(timestamp), ..self }
    }
}

/// The Authorization header together with the intermediate artifacts used to
/// derive it.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// `OAuth oauth_consumer_key="...", ...`
    pub header: String,
    pub parameter_string: String,
    pub base_string: String,
    pub signing_key: String,
    /// base64(HMAC-SHA1(base_string, signing_key)), not percent-encoded
    pub signature: String,
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("header", &self.header)
            .field("parameter_string", &self.parameter_string)
            .field("base_string", &self.base_string)
            .field("signing_key", &"[REDACTED]")
            .field("signature", &self.signature)
            .finish()
    }
}

/// Sign a request with OAuth 1.0a HMAC-SHA1.
///
/// Parameters from the URL query string and `extra_params` are collected
/// into one map keyed by encoded name. A name that appears twice keeps only
/// its last value; the protocol parameters are inserted last and so always
/// win over caller-supplied `oauth_*` entries.
///
/// # Errors
/// [`MwqueryError::Signing`] for an empty credential field, a missing
/// method, an unparseable URL, or an extra parameter without `=`. Nothing
/// is returned in that case.
pub fn sign(request: &SigningRequest<'_>) -> Result<SignedRequest> {
    let credentials = request.credentials;
    credentials.validate()?;

    if request.method.trim().is_empty() {
        return Err(MwqueryError::Signing("missing HTTP method".to_string()));
    }

    let (base_url, mut params) = split_url(request.url)?;

    for item in request.extra_params {
        let (name, value) = item.split_once('=').ok_or_else(|| {
            MwqueryError::Signing(format!(
                "malformed parameter '{}', must be formatted as name=value",
                item
            ))
        })?;
        params.insert(encode(name), encode(value));
    }

    let nonce = request
        .nonce
        .map(str::to_string)
        .unwrap_or_else(generate_nonce);
    let timestamp = request
        .timestamp
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().timestamp().to_string());

    let protocol_params = [
        (OAUTH_PARAM_KEY_CONSUMER_KEY, credentials.consumer_key.as_str()),
        (OAUTH_PARAM_KEY_NONCE, nonce.as_str()),
        (OAUTH_PARAM_KEY_SIGNATURE_METHOD, OAUTH_SIGNATURE_METHOD),
        (OAUTH_PARAM_KEY_TIMESTAMP, timestamp.as_str()),
        (OAUTH_PARAM_KEY_TOKEN, credentials.token.as_str()),
        (OAUTH_PARAM_KEY_VERSION, OAUTH_VERSION),
    ];
    for (key, value) in protocol_params {
        params.insert(encode(key), encode(value));
    }

    // BTreeMap iterates in byte-wise key order
    let parameter_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        request.method.to_ascii_uppercase(),
        encode(&base_url),
        encode(&parameter_string)
    );

    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.token_secret)
    );

    let signature = hmac_sha1_base64(&base_string, &signing_key)?;

    let header_fields = [
        (OAUTH_PARAM_KEY_CONSUMER_KEY, credentials.consumer_key.as_str()),
        (OAUTH_PARAM_KEY_NONCE, nonce.as_str()),
        (OAUTH_PARAM_KEY_SIGNATURE, signature.as_str()),
        (OAUTH_PARAM_KEY_SIGNATURE_METHOD, OAUTH_SIGNATURE_METHOD),
        (OAUTH_PARAM_KEY_TIMESTAMP, timestamp.as_str()),
        (OAUTH_PARAM_KEY_TOKEN, credentials.token.as_str()),
        (OAUTH_PARAM_KEY_VERSION, OAUTH_VERSION),
    ];
    let header = format!(
        "{} {}",
        OAUTH_HEADER,
        header_fields
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(SignedRequest {
        header,
        parameter_string,
        base_string,
        signing_key,
        signature,
    })
}

/// Split a URL into `scheme://authority/path` and its encoded query
/// parameters.
fn split_url(raw: &str) -> Result<(String, BTreeMap<String, String>)> {
    if raw.trim().is_empty() {
        return Err(MwqueryError::Signing("missing URL".to_string()));
    }
    let url = Url::parse(raw)
        .map_err(|e| MwqueryError::Signing(format!("malformed URL '{}': {}", raw, e)))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(MwqueryError::Signing(format!("URL '{}' has no host", raw)));
    }

    let params = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .collect::<BTreeMap<_, _>>();

    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);

    Ok((base.to_string(), params))
}

fn generate_nonce() -> String {
    let bytes: [u8; NONCE_BYTES] = rand::rng().random();
    STANDARD.encode(bytes)
}

fn hmac_sha1_base64(data: &str, key: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| MwqueryError::Signing(format!("invalid signing key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
