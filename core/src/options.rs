//! Per-call request options.
//!
//! `RequestOptions` collects everything a single call may override: headers,
//! query parameters, cookie, basic-auth credentials, body, multipart data,
//! content type and user agent. Options can be assembled with the chainable
//! setters or read from a JSON object with `from_value`, which rejects keys
//! outside `KNOWN_KEYS`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::body::{Body, Multipart, Part};
use crate::config::unknown_keys;
use crate::error::{Error, Result};
use crate::headers::Headers;

pub const KNOWN_KEYS: &[&str] = &[
    "headers",
    "query",
    "cookie",
    "auth",
    "body",
    "user_agent",
    "content_type",
    "multipart",
];

const AUTH_KEYS: &[&str] = &["login", "password"];

/// Basic-auth login and password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// `Basic <base64(login:password)>`
    pub fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.login, self.password));
        format!("Basic {token}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub(crate) headers: Headers,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) cookie: Option<String>,
    pub(crate) auth: Option<Credentials>,
    pub(crate) body: Option<Body>,
    pub(crate) multipart: Option<Multipart>,
    pub(crate) content_type: Option<String>,
    pub(crate) user_agent: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a JSON object.
    ///
    /// Header and query values may be strings, numbers or booleans. `body`
    /// is either a string (sent raw) or an object (form-encoded). `multipart`
    /// is `true` or an array of `[name, value]` pairs. `auth` must carry both
    /// `login` and `password`.
    pub fn from_value(value: Value) -> Result<Self> {
        let map = expect_object("options", value)?;
        Error::check_unknown_keys(unknown_keys(map.keys(), KNOWN_KEYS))?;

        let mut options = RequestOptions::new();
        for (key, value) in map {
            match key.as_str() {
                "headers" => {
                    for (name, value) in expect_object("headers", value)? {
                        let value = scalar_to_string(&name, &value)?;
                        options.headers.insert(&name, value);
                    }
                }
                "query" => {
                    for (name, value) in expect_object("query", value)? {
                        let value = scalar_to_string(&name, &value)?;
                        options.query.push((name, value));
                    }
                }
                "cookie" => options.cookie = Some(expect_string("cookie", value)?),
                "auth" => options.auth = Some(credentials_from_value(value)?),
                "body" => options.body = Some(body_from_value(value)?),
                "multipart" => options.multipart = multipart_from_value(value)?,
                "content_type" => options.content_type = Some(expect_string("content_type", value)?),
                "user_agent" => options.user_agent = Some(expect_string("user_agent", value)?),
                other => {
                    return Err(Error::UnknownKey {
                        keys: vec![other.to_string()],
                    })
                }
            }
        }
        Ok(options)
    }

    /// Add a header; `content_type` and `Content-Type` name the same header.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn headers<K: AsRef<str>, V: Into<String>>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    #[must_use]
    pub fn basic_auth(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Credentials::new(login, password));
        self
    }

    /// Raw request body, sent as-is.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    /// Form field, appended to a form body (replacing a raw body).
    #[must_use]
    pub fn form_field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let field = (name.into(), value.to_string());
        match &mut self.body {
            Some(Body::Form(pairs)) => pairs.push(field),
            _ => self.body = Some(Body::Form(vec![field])),
        }
        self
    }

    #[must_use]
    pub fn multipart(mut self, multipart: Multipart) -> Self {
        self.multipart = Some(multipart);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn expect_object(key: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(invalid(key, format!("expected an object, got {other}"))),
    }
}

fn expect_string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(invalid(key, format!("expected a string, got {other}"))),
    }
}

fn scalar_to_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(invalid(key, format!("expected a scalar, got {other}"))),
    }
}

fn credentials_from_value(value: Value) -> Result<Credentials> {
    let map = expect_object("auth", value)?;
    Error::check_unknown_keys(unknown_keys(map.keys(), AUTH_KEYS))?;

    let field = |name: &str| -> Result<Option<String>> {
        map.get(name)
            .map(|v| scalar_to_string(name, v))
            .transpose()
    };
    match (field("login")?, field("password")?) {
        (Some(login), Some(password)) => Ok(Credentials { login, password }),
        _ => Err(Error::IncompleteCredentials),
    }
}

fn body_from_value(value: Value) -> Result<Body> {
    match value {
        Value::String(raw) => Ok(Body::Raw(raw)),
        Value::Object(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (name, value) in map {
                let value = scalar_to_string(&name, &value)?;
                pairs.push((name, value));
            }
            Ok(Body::Form(pairs))
        }
        other => Err(invalid("body", format!("expected a string or an object, got {other}"))),
    }
}

fn multipart_from_value(value: Value) -> Result<Option<Multipart>> {
    match value {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::Bool(true) => Ok(Some(Multipart::new())),
        Value::Array(items) => {
            let mut multipart = Multipart::new();
            for item in items {
                let pair: (String, String) = serde_json::from_value(item)
                    .map_err(|e| invalid("multipart", format!("expected [name, value] pairs: {e}")))?;
                multipart = multipart.part(Part::text(pair.0, pair.1));
            }
            Ok(Some(multipart))
        }
        other => Err(invalid("multipart", format!("expected a boolean or an array, got {other}"))),
    }
}

fn invalid(key: &str, reason: String) -> Error {
    Error::InvalidOption {
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_keys_are_reported_in_order() {
        let err = RequestOptions::from_value(json!({
            "unknown_param_key": "test",
            "headers": {},
            "another_param_key": "wow"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Unknown keys: unknown_param_key, another_param_key");
    }

    #[test]
    fn reads_every_known_key() {
        let options = RequestOptions::from_value(json!({
            "headers": { "x_requested_with": "XMLHttpRequest", "X-Count": 3 },
            "query": { "a": "b", "page": 2, "flag": true },
            "cookie": "session=1",
            "auth": { "login": "user", "password": "passw" },
            "body": { "e": "f", "g": "k" },
            "user_agent": "agent",
            "content_type": "text/plain",
            "multipart": [["file", "data"]]
        }))
        .unwrap();

        assert_eq!(options.headers.get("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(options.headers.get("x-count"), Some("3"));
        assert_eq!(
            options.query,
            vec![
                ("a".to_string(), "b".to_string()),
                ("page".to_string(), "2".to_string()),
                ("flag".to_string(), "true".to_string()),
            ]
        );
        assert_eq!(options.cookie.as_deref(), Some("session=1"));
        assert_eq!(options.auth, Some(Credentials::new("user", "passw")));
        assert_eq!(
            options.body,
            Some(Body::Form(vec![
                ("e".to_string(), "f".to_string()),
                ("g".to_string(), "k".to_string()),
            ]))
        );
        assert_eq!(options.user_agent.as_deref(), Some("agent"));
        assert_eq!(options.content_type.as_deref(), Some("text/plain"));
        assert_eq!(options.multipart, Some(Multipart::new().text("file", "data")));
    }

    #[test]
    fn auth_requires_login_and_password() {
        let err = RequestOptions::from_value(json!({ "auth": { "login": "user" } })).unwrap_err();
        assert!(matches!(err, Error::IncompleteCredentials));

        let err = RequestOptions::from_value(json!({ "auth": { "password": "p" } })).unwrap_err();
        assert!(matches!(err, Error::IncompleteCredentials));

        let err = RequestOptions::from_value(json!({ "auth": { "login": "u", "password": "p", "realm": "x" } }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown keys: realm");
    }

    #[test]
    fn raw_body_and_multipart_flag() {
        let options = RequestOptions::from_value(json!({ "body": "a=1", "multipart": true })).unwrap();
        assert_eq!(options.body, Some(Body::Raw("a=1".to_string())));
        assert_eq!(options.multipart, Some(Multipart::new()));

        let options = RequestOptions::from_value(json!({ "multipart": false })).unwrap();
        assert!(options.multipart.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            RequestOptions::from_value(json!({ "cookie": 1 })),
            Err(Error::InvalidOption { .. })
        ));
        assert!(matches!(
            RequestOptions::from_value(json!({ "query": { "a": [1, 2] } })),
            Err(Error::InvalidOption { .. })
        ));
        assert!(matches!(
            RequestOptions::from_value(json!({ "multipart": [["only-name"]] })),
            Err(Error::InvalidOption { .. })
        ));
        assert!(RequestOptions::from_value(json!("headers")).is_err());
    }

    #[test]
    fn credentials_encode_as_basic_auth() {
        let credentials = Credentials::new("Aladdin", "open sesame");
        assert_eq!(credentials.header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn form_fields_accumulate() {
        let options = RequestOptions::new()
            .body("raw")
            .form_field("a", 1)
            .form_field("b", "two");
        assert_eq!(
            options.body,
            Some(Body::Form(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
            ]))
        );
    }

    #[test]
    fn header_setter_normalizes_names() {
        let options = RequestOptions::new()
            .header("content_type", "a")
            .headers([("User-Agent", "b")]);
        assert_eq!(options.headers.get("Content-Type"), Some("a"));
        assert_eq!(options.headers.get("user_agent"), Some("b"));
    }
}
