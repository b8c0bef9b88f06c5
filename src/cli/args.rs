//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for mwquery.

use clap::{ArgAction, Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::filter::Query;
use crate::mime::MediaType;

/// mwquery - query REST endpoints and extract values from JSON responses
#[derive(Parser, Debug, Clone)]
#[command(name = "mwquery", version, about, long_about = None)]
pub struct Args {
    /// The URL to request (alternative to --url)
    #[arg(value_name = "URL")]
    pub url_positional: Option<String>,

    // =========================================================================
    // REQUEST
    // =========================================================================

    /// Request method
    #[arg(short = 'r', long = "request", value_name = "METHOD", value_enum, default_value_t = RequestMethod::Get)]
    pub request: RequestMethod,

    /// The URL to request
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Request header as 'Name: value'. Can be used multiple times
    #[arg(short = 'H', long = "header", value_name = "HEADER", action = ArgAction::Append)]
    pub headers: Vec<String>,

    /// Body type for POST and PUT
    #[arg(short = 'm', long = "media-type", value_name = "TYPE", value_enum, default_value_t = MediaType::Json)]
    pub media_type: MediaType,

    /// Request body, or @file to read it from a file
    #[arg(short = 'd', long = "data", value_name = "DATA")]
    pub data: Option<String>,

    /// Path of a JSON file used to keep cookies between runs
    #[arg(short = 'c', long = "cookie-path", value_name = "FILE", env = "MWQUERY_COOKIE_PATH")]
    pub cookie_path: Option<PathBuf>,

    // =========================================================================
    // OAUTH 1.0a
    // =========================================================================

    /// Properties file with consumer_key, consumer_secret, token and token_secret.
    /// Enables OAuth 1.0a request signing
    #[arg(long = "oauth-config", value_name = "FILE", env = "MWQUERY_OAUTH_CONFIG")]
    pub oauth_config: Option<PathBuf>,

    /// Extra parameter to include in the OAuth signature, as name=value.
    /// Can be used multiple times
    #[arg(short = 'p', long = "oauth-param", value_name = "PARAM", action = ArgAction::Append)]
    pub oauth_params: Vec<String>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Extract a value with a JSONPath expression, as token=jsonpath
    /// (e.g. 'token=$.tokenId'). Can be used multiple times
    #[arg(short = 'q', long = "query", value_name = "QUERY", action = ArgAction::Append)]
    pub queries: Vec<Query>,

    /// Print the whole result to stderr and do nothing else
    #[arg(long = "dump", action = ArgAction::SetTrue)]
    pub dump: bool,

    /// Print every value of the JSON response as path="value"
    #[arg(short = 'f', long = "flatten", action = ArgAction::SetTrue)]
    pub flatten: bool,

    /// Exit with an error status when the response is not 2xx
    #[arg(long = "check-status", action = ArgAction::SetTrue)]
    pub check_status: bool,

    // =========================================================================
    // TROUBLESHOOTING
    // =========================================================================

    /// Log request activity to stderr
    #[arg(long = "logging", action = ArgAction::SetTrue)]
    pub logging: bool,

    /// Output format for logging: json (JSON Lines) or text (default)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Show error details
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Args {
    /// `--url` takes precedence over the positional URL
    pub fn target_url(&self) -> Option<&str> {
        self.url.as_deref().or(self.url_positional.as_deref())
    }
}

/// HTTP method
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
}

impl RequestMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log format for structured output (CI/CD)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
