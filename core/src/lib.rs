//! Blocking HTTP client wrapper with verb-named calls.
//!
//! # Overview
//! `HttpWrapper` exposes `get`/`post`/`put`/`delete` plus AJAX, JSON and
//! SOAP header presets. Each call merges per-call `RequestOptions` with the
//! client's `ClientConfig` into an `HttpRequest`, sends it through a
//! `Transport` and follows redirects up to `max_redirects`.
//!
//! # Design
//! - Request building is pure: `HttpWrapper::build` returns the exact request
//!   a call would send, which keeps header and query precedence testable
//!   without a network.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default; tests plug in their own.
//! - Header names are normalized (`content_type` and `Content-Type` are the
//!   same header) and caller-supplied headers win over defaults.
//! - Options and configuration can also be read from JSON objects; unknown
//!   keys are rejected with `Error::UnknownKey`.

pub mod body;
pub mod builder;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod headers;
pub mod http;
pub mod logging;
pub mod options;
pub mod query;
pub mod redirect;
pub mod transport;

pub use body::{Body, Multipart, Part};
pub use client::HttpWrapper;
pub use config::ClientConfig;
pub use constants::HeaderPreset;
pub use error::{Error, Result, TransportError};
pub use headers::Headers;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logging::{DebugSink, TracingSink};
pub use options::{Credentials, RequestOptions};
pub use transport::{Transport, UreqTransport};
