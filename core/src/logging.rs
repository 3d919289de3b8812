//! Debug sinks that observe request/response traffic.
//!
//! A sink sees one line per event (`-> GET http://...`, `-> user-agent: ...`,
//! `<- 301`). It can only observe; nothing it does changes how a request is
//! executed.

use crate::http::{HttpRequest, HttpResponse};

pub trait DebugSink: Send + Sync {
    fn record(&self, line: &str);
}

impl<F> DebugSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn record(&self, line: &str) {
        self(line)
    }
}

/// Forwards traffic lines to `tracing` at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn record(&self, line: &str) {
        tracing::trace!(target: "http_wrapper::wire", "{line}");
    }
}

pub(crate) fn record_request(sink: &dyn DebugSink, request: &HttpRequest) {
    sink.record(&format!("-> {} {}", request.method, request.url));
    for (name, value) in request.headers.iter() {
        sink.record(&format!("-> {name}: {value}"));
    }
    if let Some(body) = &request.body {
        sink.record(&format!("-> ({} bytes)", body.len()));
    }
}

pub(crate) fn record_response(sink: &dyn DebugSink, response: &HttpResponse) {
    sink.record(&format!("<- {}", response.status));
    for (name, value) in &response.headers {
        sink.record(&format!("<- {name}: {value}"));
    }
}
