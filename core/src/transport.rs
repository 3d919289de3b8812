//! The boundary to the network.
//!
//! # Design
//! A `Transport` performs exactly one exchange: it sends the request it is
//! given and returns whatever comes back, redirects included. Following
//! redirects, building headers and encoding bodies all happen before or
//! after this call. `UreqTransport` is the default implementation.

use std::sync::Arc;

use ureq::tls::{Certificate, RootCerts, TlsConfig};
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent never follows redirects and reports 4xx/5xx as ordinary
/// responses, leaving both to the caller. Response bodies are read in full
/// with no size limit.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut tls = TlsConfig::builder().disable_verification(!config.verify_cert);
        if let Some(path) = &config.ca_file {
            let pem = std::fs::read(path)?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| Error::Transport(Box::new(e)))?;
            tls = tls.root_certs(RootCerts::Specific(Arc::new(vec![certificate.to_owned()])));
        }

        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_connect(Some(config.timeout))
            .timeout_recv_response(Some(config.timeout))
            .timeout_recv_body(Some(config.timeout))
            .tls_config(tls.build())
            .build()
            .new_agent();

        Ok(Self { agent })
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let response = if request.method.permits_body() {
            let body: &[u8] = request.body.as_deref().unwrap_or_default();
            self.agent.run(builder.body(body)?)?
        } else {
            self.agent.run(builder.body(())?)?
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let mut body = response.into_body();
        let body = body.with_config().limit(u64::MAX).read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
