//! Turns a URL, a method and per-call options into an `HttpRequest`.
//!
//! # Precedence
//! - Headers supplied by the caller are kept. Defaults for user agent,
//!   content type and cookie only fill headers that are still missing.
//! - The `content_type` option is the one exception: it replaces a
//!   `content-type` entry from the headers map.
//! - The user agent default comes from the call, then the client
//!   configuration, then `DEFAULT_USER_AGENT`.
//! - A multipart body's boundary content type beats the preset and the
//!   method default, but never a content type the caller set explicitly.
//! - Preset headers (AJAX, JSON, SOAP) come next, then the form content
//!   type of a URL-encoded body, then the method default.

use std::borrow::Cow;

use url::Url;

use crate::body::encode_body;
use crate::config::ClientConfig;
use crate::constants::{
    HeaderPreset, AUTHORIZATION, CONTENT_TYPE, COOKIE, DEFAULT_CONTENT_TYPE, FORM_CONTENT_TYPE, USER_AGENT,
};
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::options::RequestOptions;
use crate::query::merge_query;

/// Build the request for one call. Does not touch `config`.
pub fn build_request(
    config: &ClientConfig,
    method: HttpMethod,
    preset: HeaderPreset,
    url: &str,
    options: RequestOptions,
) -> Result<HttpRequest> {
    let RequestOptions {
        mut headers,
        query,
        cookie,
        auth,
        body,
        multipart,
        content_type,
        user_agent,
    } = options;

    let mut url = parse_url(url)?;
    merge_query(&mut url, &query);

    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, content_type);
    }

    let is_multipart = multipart.is_some();
    let encoded = if method.permits_body() {
        encode_body(body, multipart)
    } else {
        None
    };
    let encoded_type = encoded.as_ref().and_then(|body| body.content_type.as_deref());

    if is_multipart {
        if let Some(boundary_type) = encoded_type {
            headers.insert_if_absent(CONTENT_TYPE, boundary_type);
        }
    }

    for (name, value) in preset.headers() {
        headers.insert_if_absent(name, *value);
    }

    headers.insert_if_absent(USER_AGENT, user_agent.unwrap_or_else(|| config.user_agent.clone()));
    headers.insert_if_absent(CONTENT_TYPE, encoded_type.unwrap_or_else(|| default_content_type(method)));

    if let Some(cookie) = cookie {
        headers.insert_if_absent(COOKIE, cookie);
    }

    if let Some(credentials) = auth {
        headers.insert(AUTHORIZATION, credentials.header_value());
    }

    Ok(HttpRequest {
        method,
        url,
        headers,
        body: encoded.map(|body| body.bytes),
    })
}

/// Parse `raw`, assuming `http://` when it does not start with an HTTP scheme.
pub fn parse_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_scheme = if has_http_scheme(raw) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("http://{raw}"))
    };
    Url::parse(&with_scheme).map_err(|source| Error::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        raw.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn default_content_type(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => FORM_CONTENT_TYPE,
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Multipart;
    use crate::constants::{
        AJAX_HEADER_NAME, DEFAULT_USER_AGENT, JSON_CONTENT_TYPE, MULTIPART_CONTENT_TYPE, SOAP_CONTENT_TYPE,
    };

    fn build(method: HttpMethod, url: &str, options: RequestOptions) -> HttpRequest {
        build_request(&ClientConfig::default(), method, HeaderPreset::Plain, url, options).unwrap()
    }

    fn build_preset(method: HttpMethod, preset: HeaderPreset, options: RequestOptions) -> HttpRequest {
        build_request(&ClientConfig::default(), method, preset, "example.com", options).unwrap()
    }

    #[test]
    fn adds_http_scheme_when_missing() {
        let req = build(HttpMethod::Get, "example.com", RequestOptions::new());
        assert_eq!(req.url, Url::parse("http://example.com").unwrap());

        let req = build(HttpMethod::Get, "localhost:3000/path", RequestOptions::new());
        assert_eq!(req.url.as_str(), "http://localhost:3000/path");

        let req = build(HttpMethod::Get, "HTTPS://example.com", RequestOptions::new());
        assert_eq!(req.url.scheme(), "https");
    }

    #[test]
    fn invalid_url_is_an_error() {
        let err = build_request(&ClientConfig::default(), HttpMethod::Get, HeaderPreset::Plain, "http://", RequestOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn default_headers_for_get() {
        let req = build(HttpMethod::Get, "http://example.com", RequestOptions::new());
        assert_eq!(req.headers.get(USER_AGENT), Some(DEFAULT_USER_AGENT));
        assert_eq!(req.headers.get(CONTENT_TYPE), Some(DEFAULT_CONTENT_TYPE));
        assert!(req.headers.get(COOKIE).is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn body_methods_default_to_form_content_type() {
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete] {
            let req = build(method, "http://example.com", RequestOptions::new());
            assert_eq!(req.headers.get(CONTENT_TYPE), Some(FORM_CONTENT_TYPE), "{method}");
        }
    }

    #[test]
    fn content_type_option_overrides_header() {
        let options = RequestOptions::new()
            .header("Content-Type", "Custom Content Type")
            .content_type("Override");
        let req = build(HttpMethod::Get, "http://example.com", options);
        assert_eq!(req.headers.get(CONTENT_TYPE), Some("Override"));
    }

    #[test]
    fn header_content_type_beats_method_default() {
        let options = RequestOptions::new().header("content_type", "Some Content Type");
        let req = build(HttpMethod::Post, "http://example.com", options);
        assert_eq!(req.headers.get("Content-Type"), Some("Some Content Type"));
    }

    #[test]
    fn user_agent_precedence() {
        let config = ClientConfig::default().user_agent("Instance Agent");

        let req = build_request(&config, HttpMethod::Get, HeaderPreset::Plain, "example.com", RequestOptions::new()).unwrap();
        assert_eq!(req.headers.get(USER_AGENT), Some("Instance Agent"));

        let options = RequestOptions::new().user_agent("Call Agent");
        let req = build_request(&config, HttpMethod::Get, HeaderPreset::Plain, "example.com", options).unwrap();
        assert_eq!(req.headers.get(USER_AGENT), Some("Call Agent"));

        let options = RequestOptions::new()
            .user_agent("Call Agent")
            .header("User-Agent", "TestUserAgent");
        let req = build_request(&config, HttpMethod::Get, HeaderPreset::Plain, "example.com", options).unwrap();
        assert_eq!(req.headers.get(USER_AGENT), Some("TestUserAgent"));
    }

    #[test]
    fn cookie_header_beats_cookie_option() {
        let req = build(HttpMethod::Get, "example.com", RequestOptions::new().cookie("some cookie"));
        assert_eq!(req.headers.get(COOKIE), Some("some cookie"));

        let options = RequestOptions::new()
            .header("Cookie", "Custom cookie")
            .cookie("should not use this one");
        let req = build(HttpMethod::Get, "example.com", options);
        assert_eq!(req.headers.get(COOKIE), Some("Custom cookie"));
    }

    #[test]
    fn merges_query_into_url() {
        let options = RequestOptions::new().query("time", "16:44").query("text", "edf");
        let req = build(HttpMethod::Get, "http://example.com/?user=test&text=abc", options);
        assert_eq!(req.url.as_str(), "http://example.com/?text=edf&time=16%3A44&user=test");
    }

    #[test]
    fn sets_every_parameter() {
        let options = RequestOptions::new()
            .content_type("Custom content type")
            .user_agent("Custom user agent")
            .header("x_requested_with", "XMLHttpRequest")
            .query("a", "b")
            .query("c", "d")
            .form_field("e", "f")
            .form_field("g", "k")
            .basic_auth("user", "passw")
            .cookie("cookie");
        let req = build(HttpMethod::Post, "http://example.com", options);

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.as_str(), "http://example.com/?a=b&c=d");
        assert_eq!(req.body.as_deref(), Some(b"e=f&g=k".as_slice()));
        assert_eq!(req.headers.get("Content-Type"), Some("Custom content type"));
        assert_eq!(req.headers.get("User-Agent"), Some("Custom user agent"));
        assert_eq!(req.headers.get("Cookie"), Some("cookie"));
        assert_eq!(req.headers.get("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(req.headers.get("Authorization"), Some("Basic dXNlcjpwYXNzdw=="));
    }

    #[test]
    fn default_headers_are_added_in_order() {
        let req = build(HttpMethod::Get, "example.com", RequestOptions::new().cookie("c"));
        let names: Vec<&str> = req.headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![USER_AGENT, CONTENT_TYPE, COOKIE]);
    }

    #[test]
    fn bodyless_methods_drop_the_body() {
        let req = build(HttpMethod::Get, "example.com", RequestOptions::new().body("ignored"));
        assert!(req.body.is_none());

        let req = build(HttpMethod::Delete, "example.com", RequestOptions::new().form_field("a", 1));
        assert!(req.body.is_none());
    }

    #[test]
    fn multipart_sets_boundary_content_type() {
        let options = RequestOptions::new()
            .form_field("user", "bob")
            .multipart(Multipart::new().text("file", "data"));
        let req = build(HttpMethod::Post, "example.com", options);

        let content_type = req.headers.get(CONTENT_TYPE).unwrap();
        let boundary = content_type
            .strip_prefix(&format!("{MULTIPART_CONTENT_TYPE}; boundary="))
            .unwrap();
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
        assert!(body.find("name=\"user\"").unwrap() < body.find("name=\"file\"").unwrap());
    }

    #[test]
    fn explicit_content_type_beats_multipart() {
        let options = RequestOptions::new()
            .content_type("multipart/related")
            .multipart(Multipart::new().text("a", "b"));
        let req = build(HttpMethod::Post, "example.com", options);
        assert_eq!(req.headers.get(CONTENT_TYPE), Some("multipart/related"));
        assert!(req.body.is_some());
    }

    #[test]
    fn multipart_boundary_beats_preset_content_type() {
        for preset in [HeaderPreset::Json, HeaderPreset::AjaxJson, HeaderPreset::Soap] {
            let options = RequestOptions::new().multipart(Multipart::new().text("a", "b"));
            let req = build_preset(HttpMethod::Post, preset, options);

            let content_type = req.headers.get(CONTENT_TYPE).unwrap();
            let boundary = content_type
                .strip_prefix(&format!("{MULTIPART_CONTENT_TYPE}; boundary="))
                .unwrap_or_else(|| panic!("{preset:?}: {content_type}"));
            let body = String::from_utf8(req.body.unwrap()).unwrap();
            assert!(body.starts_with(&format!("--{boundary}\r\n")), "{preset:?}");
        }
    }

    #[test]
    fn caller_content_type_beats_multipart_under_preset() {
        let options = RequestOptions::new()
            .header("Content-Type", "multipart/mixed")
            .multipart(Multipart::new().text("a", "b"));
        let req = build_preset(HttpMethod::Post, HeaderPreset::Json, options);
        assert_eq!(req.headers.get(CONTENT_TYPE), Some("multipart/mixed"));
    }

    #[test]
    fn preset_content_type_beats_form_and_method_defaults() {
        let req = build_preset(HttpMethod::Post, HeaderPreset::Json, RequestOptions::new().form_field("a", "1"));
        assert_eq!(req.headers.get(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
        assert_eq!(req.body.as_deref(), Some(b"a=1".as_slice()));

        let req = build_preset(HttpMethod::Get, HeaderPreset::Soap, RequestOptions::new());
        assert_eq!(req.headers.get(CONTENT_TYPE), Some(SOAP_CONTENT_TYPE));
    }

    #[test]
    fn preset_never_replaces_caller_headers() {
        let options = RequestOptions::new()
            .header("X-Requested-With", "fetch")
            .content_type("application/vnd.api+json");
        let req = build_preset(HttpMethod::Put, HeaderPreset::AjaxJson, options);
        assert_eq!(req.headers.get(AJAX_HEADER_NAME), Some("fetch"));
        assert_eq!(req.headers.get(CONTENT_TYPE), Some("application/vnd.api+json"));
    }

    #[test]
    fn form_body_keeps_form_content_type() {
        let req = build(HttpMethod::Put, "example.com", RequestOptions::new().form_field("a", "1"));
        assert_eq!(req.headers.get(CONTENT_TYPE), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.body.as_deref(), Some(b"a=1".as_slice()));
    }

    #[test]
    fn building_does_not_change_config() {
        let config = ClientConfig::default();
        let before = format!("{config:?}");
        let _ = build_request(&config, HttpMethod::Post, HeaderPreset::Plain, "example.com", RequestOptions::new().user_agent("x"));
        assert_eq!(format!("{config:?}"), before);
    }
}
