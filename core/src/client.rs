//! Verb-oriented client facade.
//!
//! # Design
//! `HttpWrapper` owns a `ClientConfig` and, optionally, a custom
//! `Transport`. Every call builds its own `HttpRequest` from the options it is
//! given, so the wrapper carries no per-call state and can be shared between
//! threads. Without a custom transport a `UreqTransport` is built from the
//! configuration on first use and kept; setters that change timeout, TLS or
//! CA settings drop it so the next call rebuilds it.
//!
//! Each verb comes in a plain form and a form per `HeaderPreset`:
//! `get`, `get_ajax`, `get_json`, `get_ajax_json` (alias `get_json_ajax`)
//! and `get_soap`, and the same for `post`, `put` and `delete`.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde_json::Value;

use crate::builder::build_request;
use crate::config::ClientConfig;
use crate::constants::HeaderPreset;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logging::DebugSink;
use crate::options::RequestOptions;
use crate::redirect::follow_redirects;
use crate::transport::{Transport, UreqTransport};

#[derive(Clone, Default)]
pub struct HttpWrapper {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    default_transport: OnceLock<UreqTransport>,
}

impl fmt::Debug for HttpWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpWrapper")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

macro_rules! verb_methods {
    ($method:expr => $plain:ident, $ajax:ident, $json:ident, $ajax_json:ident, $json_ajax:ident, $soap:ident) => {
        pub fn $plain(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.request($method, HeaderPreset::Plain, url, options)
        }

        pub fn $ajax(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.request($method, HeaderPreset::Ajax, url, options)
        }

        pub fn $json(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.request($method, HeaderPreset::Json, url, options)
        }

        pub fn $ajax_json(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.request($method, HeaderPreset::AjaxJson, url, options)
        }

        pub fn $json_ajax(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.$ajax_json(url, options)
        }

        pub fn $soap(&self, url: &str, options: RequestOptions) -> Result<HttpResponse> {
            self.request($method, HeaderPreset::Soap, url, options)
        }
    };
}

impl HttpWrapper {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            default_transport: OnceLock::new(),
        }
    }

    /// Build a wrapper from a JSON configuration object, see
    /// `ClientConfig::from_value`.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self::new(ClientConfig::from_value(value)?))
    }

    /// Use `transport` instead of the default `ureq` agent.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport: Some(transport),
            default_transport: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
        self.default_transport = OnceLock::new();
    }

    pub fn set_verify_cert(&mut self, verify: bool) {
        self.config.verify_cert = verify;
        self.default_transport = OnceLock::new();
    }

    pub fn set_ca_file(&mut self, path: Option<PathBuf>) {
        self.config.ca_file = path;
        self.default_transport = OnceLock::new();
    }

    pub fn set_max_redirects(&mut self, max_redirects: u32) {
        self.config.max_redirects = max_redirects;
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.config.user_agent = user_agent.into();
    }

    pub fn set_logger(&mut self, sink: Option<Arc<dyn DebugSink>>) {
        self.config.logger = sink;
    }

    verb_methods!(HttpMethod::Get => get, get_ajax, get_json, get_ajax_json, get_json_ajax, get_soap);
    verb_methods!(HttpMethod::Post => post, post_ajax, post_json, post_ajax_json, post_json_ajax, post_soap);
    verb_methods!(HttpMethod::Put => put, put_ajax, put_json, put_ajax_json, put_json_ajax, put_soap);
    verb_methods!(HttpMethod::Delete => delete, delete_ajax, delete_json, delete_ajax_json, delete_json_ajax, delete_soap);

    /// POST and return the response's `Set-Cookie` value, unparsed.
    pub fn post_and_get_cookie(&self, url: &str, options: RequestOptions) -> Result<Option<String>> {
        Ok(self.post(url, options)?.set_cookie())
    }

    /// Build the request with `preset` headers and execute it.
    pub fn request(
        &self,
        method: HttpMethod,
        preset: HeaderPreset,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = self.build_with_preset(method, preset, url, options)?;
        self.execute(request)
    }

    /// Build the request a plain verb call would send, without sending it.
    pub fn build(&self, method: HttpMethod, url: &str, options: RequestOptions) -> Result<HttpRequest> {
        self.build_with_preset(method, HeaderPreset::Plain, url, options)
    }

    pub fn build_with_preset(
        &self,
        method: HttpMethod,
        preset: HeaderPreset,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest> {
        build_request(&self.config, method, preset, url, options)
    }

    /// Send a prepared request as-is, following redirects.
    ///
    /// No defaults are applied: the request goes out with exactly the
    /// method, target URL, headers and body it carries.
    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let sink = self.config.logger.as_deref();
        match &self.transport {
            Some(transport) => follow_redirects(transport.as_ref(), request, self.config.max_redirects, sink),
            None => follow_redirects(self.default_transport()?, request, self.config.max_redirects, sink),
        }
    }

    fn default_transport(&self) -> Result<&UreqTransport> {
        if let Some(transport) = self.default_transport.get() {
            return Ok(transport);
        }
        let transport = UreqTransport::new(&self.config)?;
        Ok(self.default_transport.get_or_init(|| transport))
    }
}
