//! Error types for the HTTP wrapper.
//!
//! # Design
//! Unknown keys and redirect exhaustion are the two failures this crate
//! raises on its own. Everything the transport reports (connection refused,
//! timeouts, TLS failures) is carried through `Transport` with the original
//! error as its source, so callers can downcast it.

use thiserror::Error;

/// Error returned by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration or options object contained keys outside its
    /// recognized set. Keys are listed in the order they were given.
    #[error("Unknown keys: {}", .keys.join(", "))]
    UnknownKey { keys: Vec<String> },

    /// A redirect arrived after `limit` redirects had already been followed.
    #[error("Too many redirects!")]
    TooManyRedirects { limit: u32 },

    /// Basic auth was requested with only one of login and password.
    #[error("basic auth requires both login and password")]
    IncompleteCredentials,

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A recognized key carried a value of the wrong shape.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(TransportError),
}

impl Error {
    /// Build an `UnknownKey` error from the offending keys, or `Ok` when
    /// there are none.
    pub(crate) fn check_unknown_keys(keys: Vec<String>) -> Result<()> {
        if keys.is_empty() {
            Ok(())
        } else {
            Err(Error::UnknownKey { keys })
        }
    }
}
