//! Query string merging and `application/x-www-form-urlencoded` encoding.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Everything except the RFC 3986 unreserved characters is escaped, so spaces
/// become `%20` rather than `+`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode key/value pairs as `k1=v1&k2=v2`, keeping the given order.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded = String::new();
    for (key, value) in pairs {
        if !encoded.is_empty() {
            encoded.push('&');
        }
        encoded.extend(utf8_percent_encode(key, FORM_ENCODE_SET));
        encoded.push('=');
        encoded.extend(utf8_percent_encode(value, FORM_ENCODE_SET));
    }
    encoded
}

/// Decode a URL-encoded string (`+` or `%20` for spaces) into pairs.
pub fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

/// Overlay `params` onto the query string already present in `url`.
///
/// Caller values replace same-named existing values; untouched keys are kept.
/// The merged query is written back sorted by key. A `url` is left untouched
/// when `params` is empty.
pub fn merge_query(url: &mut Url, params: &[(String, String)]) {
    if params.is_empty() {
        return;
    }

    let mut merged: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
    for (key, value) in params {
        merged.insert(key.clone(), value.clone());
    }

    let query = encode_pairs(merged.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    url.set_query(Some(&query));
}
