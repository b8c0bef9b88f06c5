//! RFC 3986 percent-encoding as OAuth 1.0a uses it.

use percent_encoding::{utf8_percent_encode, AsciiSet};

use crate::errors::{MwqueryError, Result};

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
//
// A space becomes `%20` (never `+`), `+` becomes `%2B`, `*` becomes `%2A`.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for use in an OAuth signature or header.
pub fn encode(input: &str) -> String {
    utf8_percent_encode(input, TARGETS_FOR_PARAMS).to_string()
}

/// Encode a `name=value&name=value` body so that each name and value is
/// escaped with [`encode`].
///
/// Pairs keep their input order. Empty segments (`a=1&&b=2`) are skipped; a
/// segment without `=` is rejected.
pub fn encode_form_data(data: &str) -> Result<String> {
    let pairs = split_pairs(data)?;
    Ok(pairs
        .iter()
        .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
        .collect::<Vec<_>>()
        .join("&"))
}

/// Split a raw `name=value&...` string into its pairs, splitting each pair at
/// the first `=`.
pub fn split_pairs(data: &str) -> Result<Vec<(&str, &str)>> {
    data.split('&')
        .filter(|s| !s.is_empty())
        .map(|item| {
            item.split_once('=').ok_or_else(|| {
                MwqueryError::Argument(format!(
                    "malformed parameter '{}', must be formatted as name=value",
                    item
                ))
            })
        })
        .collect()
}
