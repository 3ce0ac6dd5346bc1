//! Handshake failure taxonomy.
//!
//! Every failure is terminal for the handshake attempt and is returned as a
//! value. Each variant carries the offending line or a dump of the collected
//! header map so the caller can log it before closing the transport.

use std::io;

use thiserror::Error;

/// Why a draft-76 upgrade request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// The transport failed while reading the request or writing the response.
    #[error("I/O error: {0}")]
    IOError(String),

    /// The first line was not `GET <path> HTTP/1.1`.
    #[error("invalid GET request line: {0:?}")]
    InvalidGETRequest(String),

    /// A header line was empty-at-EOF or had no `key: value` shape.
    #[error("invalid header line: {0:?}")]
    InvalidHeaderLine(String),

    /// At least one of the six required keys was absent.
    #[error("missing required header keys in {0}")]
    MissingHeaderKeys(String),

    /// `Sec-WebSocket-Key1` contained no space characters.
    #[error("Sec-WebSocket-Key1 has no spaces: {0}")]
    BadFirstSecurityKey(String),

    /// `Sec-WebSocket-Key2` contained no space characters.
    #[error("Sec-WebSocket-Key2 has no spaces: {0}")]
    BadSecondSecurityKey(String),
}

impl From<io::Error> for HandshakeError {
    fn from(e: io::Error) -> Self {
        HandshakeError::IOError(e.to_string())
    }
}
