//! HTTP client functionality

pub mod http;
pub mod result;
pub mod transport;

// Re-exports
pub use http::HttpClient;
pub use result::{CookieOp, CookieWarning, HttpResult};
pub use transport::{Exchange, RawResponse, ReqwestTransport, Transport, USER_AGENT_STRING};
