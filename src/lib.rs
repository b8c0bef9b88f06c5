//! mwquery library interface
//!
//! A cookie-aware HTTP client for the command line that can sign requests
//! with OAuth 1.0a and pull values out of JSON responses.
//!
//! # Module Organization
//!
//! - [`oauth`] - Percent encoding and OAuth 1.0a request signing
//! - [`cookies`] - Host-keyed cookie jar with JSON file persistence
//! - [`client`] - Lock-serialized HTTP client and its results
//! - [`errors`] - Error types (MwqueryError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod cli;
pub mod client;
pub mod cookies;
pub mod core;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod mime;
pub mod oauth;
pub mod output;
pub mod status;
pub mod utils;
