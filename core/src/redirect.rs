//! Bounded redirect following.
//!
//! A request moves from pending to dispatched; a redirection-class response
//! either sends it round again with a new target (redirected) or, once the
//! hop budget is spent, ends the call with `TooManyRedirects`. Any other
//! response is terminal and returned unchanged, whatever its status.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::logging::{record_request, record_response, DebugSink};
use crate::transport::Transport;

/// Dispatch `request`, following at most `max_redirects` redirects.
///
/// Each hop keeps method, headers and body; only the URL changes. Relative
/// `Location` values are resolved against the URL that produced them.
pub fn follow_redirects(
    transport: &dyn Transport,
    mut request: HttpRequest,
    max_redirects: u32,
    sink: Option<&dyn DebugSink>,
) -> Result<HttpResponse> {
    let mut remaining = max_redirects;
    loop {
        if let Some(sink) = sink {
            record_request(sink, &request);
        }
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = transport.send(&request).map_err(Error::Transport)?;
        if let Some(sink) = sink {
            record_response(sink, &response);
        }

        let Some(location) = response.location() else {
            debug!(status = response.status, url = %request.url, "terminal response");
            return Ok(response);
        };

        if remaining == 0 {
            warn!(limit = max_redirects, url = %request.url, "redirect limit reached");
            return Err(Error::TooManyRedirects {
                limit: max_redirects,
            });
        }
        remaining -= 1;

        let next = request.url.join(location).map_err(|source| Error::InvalidUrl {
            url: location.to_owned(),
            source,
        })?;
        debug!(status = response.status, from = %request.url, to = %next, remaining, "following redirect");
        request.url = next;
    }
}
