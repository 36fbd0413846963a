//! Individual comparison criteria.

use crate::request::{HeaderFields, StubRequest};
use url::Url;

/// Path must be equal; query parameters are compared as a sorted multiset.
pub fn url_matches(a: &StubRequest, b: &StubRequest) -> bool {
    a.url.path() == b.url.path() && sorted_query_pairs(&a.url) == sorted_query_pairs(&b.url)
}

pub fn method_matches(a: &StubRequest, b: &StubRequest) -> bool {
    a.method == b.method
}

/// Header names are compared case-insensitively, order is significant.
pub fn headers_match(a: &StubRequest, b: &StubRequest) -> bool {
    header_signature(&a.headers) == header_signature(&b.headers)
}

/// Byte-exact comparison; `None` only equals `None`.
pub fn body_matches(a: &StubRequest, b: &StubRequest) -> bool {
    a.body == b.body
}

/// Percent-decoded query pairs sorted by key, then by value.
///
/// `+` is kept as is. A pair without `=` has an empty value.
pub fn sorted_query_pairs(url: &Url) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect();
    pairs.sort();
    pairs
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn header_signature(headers: &HeaderFields) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| format!("{}{}", name.to_lowercase(), value))
        .collect()
}
