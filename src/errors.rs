//! Error types for mwquery

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mwquery
#[derive(Error, Debug)]
pub enum MwqueryError {
    /// Bad input to the OAuth signer (missing credential, malformed
    /// parameter or URL). Raised before any network activity.
    #[error("Signing error: {0}")]
    Signing(String),

    /// DNS, connect, timeout or malformed-response failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cookie file {}: {message}", path.display())]
    CookiePersistence {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Query error: {0}")]
    Query(String),
}

impl MwqueryError {
    pub(crate) fn cookie_file(path: &std::path::Path, message: impl Into<String>) -> Self {
        MwqueryError::CookiePersistence {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MwqueryError>;
