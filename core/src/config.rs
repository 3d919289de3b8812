//! Client-wide configuration.
//!
//! `ClientConfig` is built either with chainable setters or from a JSON
//! object via `from_value`. The JSON form only accepts the keys in
//! `KNOWN_KEYS` (plus the `validate_ssl_cert` alias); anything else is
//! reported as `Error::UnknownKey`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::logging::{DebugSink, TracingSink};

pub const KNOWN_KEYS: &[&str] = &[
    "timeout",
    "verify_cert",
    "validate_ssl_cert",
    "ca_file",
    "logger",
    "max_redirects",
    "user_agent",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub verify_cert: bool,
    pub ca_file: Option<PathBuf>,
    pub max_redirects: u32,
    pub user_agent: String,
    pub logger: Option<Arc<dyn DebugSink>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            verify_cert: true,
            ca_file: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            logger: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout", &self.timeout)
            .field("verify_cert", &self.verify_cert)
            .field("ca_file", &self.ca_file)
            .field("max_redirects", &self.max_redirects)
            .field("user_agent", &self.user_agent)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[derive(Deserialize)]
struct RawConfig {
    /// Seconds.
    timeout: Option<f64>,
    #[serde(alias = "validate_ssl_cert")]
    verify_cert: Option<bool>,
    ca_file: Option<PathBuf>,
    logger: Option<bool>,
    max_redirects: Option<u32>,
    user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from a JSON object.
    ///
    /// `timeout` is given in seconds; `logger: true` routes traffic lines to
    /// `tracing` through `TracingSink`. `validate_ssl_cert` is an alias of
    /// `verify_cert`; an object carrying both is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = &value else {
            return Err(Error::InvalidOption {
                key: "config".to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };
        Error::check_unknown_keys(unknown_keys(map.keys(), KNOWN_KEYS))?;
        if map.contains_key("verify_cert") && map.contains_key("validate_ssl_cert") {
            return Err(Error::InvalidOption {
                key: "validate_ssl_cert".to_string(),
                reason: "alias of `verify_cert`, give only one of them".to_string(),
            });
        }

        let raw: RawConfig = serde_json::from_value(value)?;
        let mut config = ClientConfig::default();
        if let Some(seconds) = raw.timeout {
            config.timeout = Duration::try_from_secs_f64(seconds).map_err(|e| Error::InvalidOption {
                key: "timeout".to_string(),
                reason: e.to_string(),
            })?;
        }
        if let Some(verify) = raw.verify_cert {
            config.verify_cert = verify;
        }
        config.ca_file = raw.ca_file;
        if raw.logger == Some(true) {
            config.logger = Some(Arc::new(TracingSink));
        }
        if let Some(max_redirects) = raw.max_redirects {
            config.max_redirects = max_redirects;
        }
        if let Some(user_agent) = raw.user_agent {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn verify_cert(mut self, verify: bool) -> Self {
        self.verify_cert = verify;
        self
    }

    #[must_use]
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn logger(mut self, sink: impl DebugSink + 'static) -> Self {
        self.logger = Some(Arc::new(sink));
        self
    }
}

/// Keys of `keys` not present in `known`, in input order.
pub(crate) fn unknown_keys<'a>(keys: impl Iterator<Item = &'a String>, known: &[&str]) -> Vec<String> {
    keys.filter(|key| !known.contains(&key.as_str()))
        .cloned()
        .collect()
}
