//! Server-side draft-76 handshake.
//!
//! Parse, validate, and only then respond. Nothing is written to the stream
//! unless validation succeeds, so a rejected client sees the connection
//! exactly as the transport left it.
//!
//! - [`shake`]: WebSocket-only handshake
//! - [`shake_or_plain`]: Handshake that hands plain HTTP requests back to the caller

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::error::HandshakeError;
use crate::parse::{detect_request, parse_request, Incoming};
use crate::request::{validate, RawRequest, Request};
use crate::response::write_response;

/// Outcome of [`shake_or_plain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiated {
    /// Not an upgrade. Nothing was written and nothing past the headers was read.
    PlainHttp { path: String, headers: RawRequest },
    /// Upgrade accepted and the response written.
    WebSocket(Request),
}

/// Perform the handshake on `stream`.
///
/// On success the response has been written and flushed and the stream is
/// positioned at the first frame.
pub fn shake<S: BufRead + Write>(stream: &mut S) -> Result<Request, HandshakeError> {
    let raw = parse_request(stream).inspect_err(|e| warn!(error = %e, "unreadable handshake"))?;
    accept(stream, raw)
}

/// Like [`shake`], but returns plain HTTP requests instead of rejecting them.
pub fn shake_or_plain<S: BufRead + Write>(stream: &mut S) -> Result<Negotiated, HandshakeError> {
    match detect_request(stream).inspect_err(|e| warn!(error = %e, "unreadable request"))? {
        Incoming::PlainHttp { path, headers } => Ok(Negotiated::PlainHttp { path, headers }),
        Incoming::Upgrade(raw) => accept(stream, raw).map(Negotiated::WebSocket),
    }
}

fn accept<S: Write>(stream: &mut S, raw: RawRequest) -> Result<Request, HandshakeError> {
    let request = validate(raw).inspect_err(|e| warn!(error = %e, "handshake rejected"))?;
    debug!(
        host = request.host(),
        path = request.path(),
        origin = request.origin(),
        "handshake validated"
    );

    write_response(stream, &request)
        .inspect_err(|e| warn!(error = %e, "handshake response failed"))?;
    debug!(path = request.path(), "handshake complete");
    Ok(request)
}
