//! OAuth 1.0a request signing
//!
//! - [`encode`] - RFC 3986 percent-encoding used by the signer and form bodies
//! - [`signer`] - HMAC-SHA1 signature and Authorization header
//! - [`config`] - credentials from a properties file

pub mod config;
pub mod encode;
pub mod signer;

pub use config::load_credentials;
pub use encode::{encode, encode_form_data};
pub use signer::{sign, Credentials, SignedRequest, SigningRequest};
