//! `token=jsonpath` extraction from JSON responses
//!
//! Queries are evaluated with jsonpath-rust.

use jsonpath_rust::JsonPath;
use serde_json::Value as JsonValue;

use crate::errors::{MwqueryError, Result};
use crate::output::scalar_text;

/// A named JSONPath expression from `-q token=$.path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub token: String,
    pub path: String,
}

impl std::str::FromStr for Query {
    type Err = MwqueryError;

    /// Split at the first `=`; both sides are trimmed and must be non-empty.
    fn from_str(s: &str) -> Result<Self> {
        let (token, path) = s
            .split_once('=')
            .ok_or_else(|| MwqueryError::Argument(format!("query '{}' is not formatted as 'token=jsonpath'", s)))?;
        let (token, path) = (token.trim(), path.trim());
        if token.is_empty() || path.is_empty() {
            return Err(MwqueryError::Argument(format!("query '{}' needs both a token and a path", s)));
        }
        Ok(Self {
            token: token.to_string(),
            path: path.to_string(),
        })
    }
}

impl Query {
    /// Evaluate against `document`.
    ///
    /// A single match is rendered as its scalar text, several matches as a
    /// compact JSON array. No match is an error.
    pub fn evaluate(&self, document: &JsonValue) -> Result<String> {
        let matches = document
            .query(&self.path)
            .map_err(|e| MwqueryError::Query(format!("{}: {}", self.path, e)))?;

        match matches.as_slice() {
            [] => Err(MwqueryError::Query(format!("{}: no match", self.path))),
            [single] => Ok(scalar_text(single)),
            many => Ok(JsonValue::Array(many.iter().map(|v| (*v).clone()).collect()).to_string()),
        }
    }
}

/// Run every query against a response body, producing `(token, value)`
/// pairs in query order.
pub fn apply_queries(body: &str, queries: &[Query]) -> Result<Vec<(String, String)>> {
    if queries.is_empty() {
        return Ok(Vec::new());
    }
    let document: JsonValue = serde_json::from_str(body)?;
    queries
        .iter()
        .map(|q| Ok((q.token.clone(), q.evaluate(&document)?)))
        .collect()
}
