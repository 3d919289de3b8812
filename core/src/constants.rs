//! Header names, content types and the header presets applied by the
//! verb-oriented methods on `HttpWrapper`.
//!
//! Header names are stored in their normalized form (lowercase, hyphenated),
//! the same form `headers::normalize_header_name` produces, so they can be
//! compared directly against keys in a `Headers` map.

/// User agent sent when neither the call nor the client configures one.
pub const DEFAULT_USER_AGENT: &str = concat!("http-wrapper/", env!("CARGO_PKG_VERSION"));

pub const CONTENT_TYPE: &str = "content-type";
pub const USER_AGENT: &str = "user-agent";
pub const COOKIE: &str = "cookie";
pub const AUTHORIZATION: &str = "authorization";
pub const AJAX_HEADER_NAME: &str = "x-requested-with";

pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=UTF-8";

pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

/// A fixed set of headers added while a request is built.
///
/// Preset headers never replace a header the caller already supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderPreset {
    Plain,
    Ajax,
    Json,
    AjaxJson,
    Soap,
}

impl HeaderPreset {
    pub fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            HeaderPreset::Plain => &[],
            HeaderPreset::Ajax => &[(AJAX_HEADER_NAME, AJAX_HEADER_VALUE)],
            HeaderPreset::Json => &[(CONTENT_TYPE, JSON_CONTENT_TYPE)],
            HeaderPreset::AjaxJson => &[
                (AJAX_HEADER_NAME, AJAX_HEADER_VALUE),
                (CONTENT_TYPE, JSON_CONTENT_TYPE),
            ],
            HeaderPreset::Soap => &[(CONTENT_TYPE, SOAP_CONTENT_TYPE)],
        }
    }
}
