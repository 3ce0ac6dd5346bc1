//! Opening-handshake reader.
//!
//! Reads the request line, the header block up to the blank line, and then
//! the 8 raw token bytes that draft-76 clients send with no terminator.
//!
//! - [`parse_request`]: WebSocket-only entry point, always consumes the token
//! - [`detect_request`]: Falls back to plain HTTP when the upgrade headers are absent

use std::io::BufRead;

use tracing::{debug, trace};

use crate::error::HandshakeError;
use crate::request::RawRequest;

/// What the client opened the connection with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// An ordinary HTTP request. No bytes past the blank line were consumed.
    PlainHttp { path: String, headers: RawRequest },
    /// A WebSocket upgrade, token included.
    Upgrade(RawRequest),
}

/// Read a complete draft-76 opening handshake.
pub fn parse_request<R: BufRead>(stream: &mut R) -> Result<RawRequest, HandshakeError> {
    let mut raw = read_head(stream)?;
    read_token(stream, &mut raw)?;
    Ok(raw)
}

/// Read the request head and consume the token only if it is an upgrade.
///
/// Upgrades are recognised by `Upgrade: WebSocket` together with
/// `Connection: Upgrade`. Anything else is handed back as plain HTTP so the
/// caller can serve it normally.
pub fn detect_request<R: BufRead>(stream: &mut R) -> Result<Incoming, HandshakeError> {
    let mut raw = read_head(stream)?;
    if !raw.is_upgrade() {
        debug!(path = raw.path(), "plain HTTP request");
        let path = raw.path().to_string();
        return Ok(Incoming::PlainHttp { path, headers: raw });
    }
    read_token(stream, &mut raw)?;
    Ok(Incoming::Upgrade(raw))
}

/// Request line and headers, up to and including the blank line.
fn read_head<R: BufRead>(stream: &mut R) -> Result<RawRequest, HandshakeError> {
    let request_line = read_line(stream)?.unwrap_or_default();
    let Some(path) = request_path(&request_line).map(str::to_string) else {
        return Err(HandshakeError::InvalidGETRequest(request_line));
    };
    let mut raw = RawRequest::new(path);

    loop {
        let line = match read_line(stream)? {
            Some(line) => line,
            None => return Err(HandshakeError::InvalidHeaderLine(String::new())),
        };
        if line.is_empty() {
            return Ok(raw);
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(HandshakeError::InvalidHeaderLine(line));
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        trace!(key = key, value = value, "header");
        raw.insert(key, value);
    }
}

fn read_token<R: BufRead>(stream: &mut R, raw: &mut RawRequest) -> Result<(), HandshakeError> {
    let mut token = [0u8; 8];
    stream.read_exact(&mut token)?;
    raw.set_token(token);
    Ok(())
}

/// One line without its `\n` and a single trailing `\r`. `None` at EOF.
fn read_line<R: BufRead>(stream: &mut R) -> Result<Option<String>, HandshakeError> {
    let mut buf = Vec::new();
    if stream.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Path from `GET <path> HTTP/1.1`.
fn request_path(line: &str) -> Option<&str> {
    let path = line.strip_prefix("GET ")?.strip_suffix(" HTTP/1.1")?;
    if path.is_empty() || path.contains(' ') {
        return None;
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    const HANDSHAKE: &[u8] = b"GET /demo HTTP/1.1\r\n\
        Host: example.com\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Key2: 12998 5 Y3 1  .P00\r\n\
        Sec-WebSocket-Protocol: sample\r\n\
        Upgrade: WebSocket\r\n\
        Sec-WebSocket-Key1: 4 @1  46546xW%0l 1 5\r\n\
        Origin: http://example.com\r\n\
        \r\n\
        ^n:ds[4U";

    #[test]
    fn test_parse_full_handshake() {
        let mut cursor = Cursor::new(HANDSHAKE);
        let raw = parse_request(&mut cursor).unwrap();
        assert_eq!(raw.path(), "/demo");
        assert_eq!(raw.get("Host"), Some("example.com"));
        assert_eq!(raw.get("Origin"), Some("http://example.com"));
        assert_eq!(raw.get("Sec-WebSocket-Key1"), Some("4 @1  46546xW%0l 1 5"));
        assert_eq!(raw.get("Sec-WebSocket-Key2"), Some("12998 5 Y3 1  .P00"));
        assert_eq!(raw.token(), Some(b"^n:ds[4U"));
    }

    #[test]
    fn test_parse_leaves_trailing_bytes_unread() {
        let mut input = HANDSHAKE.to_vec();
        input.extend_from_slice(b"\x00hi\xFF");
        let mut cursor = Cursor::new(input);
        parse_request(&mut cursor).unwrap();
        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"\x00hi\xFF");
    }

    #[test]
    fn test_invalid_request_line() {
        let mut cursor = Cursor::new(&b"POST /demo HTTP/1.1\r\n\r\n"[..]);
        let err = parse_request(&mut cursor).unwrap_err();
        assert_eq!(err, HandshakeError::InvalidGETRequest("POST /demo HTTP/1.1".to_string()));
    }

    #[test]
    fn test_wrong_http_version() {
        let mut cursor = Cursor::new(&b"GET /demo HTTP/1.0\r\n\r\n"[..]);
        assert!(matches!(
            parse_request(&mut cursor),
            Err(HandshakeError::InvalidGETRequest(_))
        ));
    }

    #[test]
    fn test_empty_stream_is_invalid_request_line() {
        let mut cursor = Cursor::new(&b""[..]);
        let err = parse_request(&mut cursor).unwrap_err();
        assert_eq!(err, HandshakeError::InvalidGETRequest(String::new()));
    }

    #[test]
    fn test_eof_inside_headers() {
        let mut cursor = Cursor::new(&b"GET / HTTP/1.1\r\nHost: a\r\n"[..]);
        let err = parse_request(&mut cursor).unwrap_err();
        assert_eq!(err, HandshakeError::InvalidHeaderLine(String::new()));
    }

    #[test]
    fn test_header_without_colon() {
        let mut cursor = Cursor::new(&b"GET / HTTP/1.1\r\nnonsense\r\n\r\n"[..]);
        let err = parse_request(&mut cursor).unwrap_err();
        assert_eq!(err, HandshakeError::InvalidHeaderLine("nonsense".to_string()));
    }

    #[test]
    fn test_value_loses_exactly_one_leading_space() {
        let mut cursor =
            Cursor::new(&b"GET / HTTP/1.1\r\nA:  two\r\nB:none\r\nC: x: y\r\n\r\n12345678"[..]);
        let raw = parse_request(&mut cursor).unwrap();
        assert_eq!(raw.get("A"), Some(" two"));
        assert_eq!(raw.get("B"), Some("none"));
        assert_eq!(raw.get("C"), Some("x: y"));
    }

    #[test]
    fn test_bare_newlines_accepted() {
        let mut cursor = Cursor::new(&b"GET /x HTTP/1.1\nHost: h\n\n12345678"[..]);
        let raw = parse_request(&mut cursor).unwrap();
        assert_eq!(raw.get("Host"), Some("h"));
        assert_eq!(raw.token(), Some(b"12345678"));
    }

    #[test]
    fn test_short_token_is_io_error() {
        let mut cursor = Cursor::new(&b"GET / HTTP/1.1\r\n\r\nabc"[..]);
        assert!(matches!(parse_request(&mut cursor), Err(HandshakeError::IOError(_))));
    }

    #[test]
    fn test_duplicate_headers_overwrite() {
        let mut cursor = Cursor::new(&b"GET / HTTP/1.1\r\nHost: a\r\nHost: b\r\n\r\n12345678"[..]);
        let raw = parse_request(&mut cursor).unwrap();
        assert_eq!(raw.get("Host"), Some("b"));
    }

    #[test]
    fn test_detect_upgrade() {
        let mut cursor = Cursor::new(HANDSHAKE);
        match detect_request(&mut cursor).unwrap() {
            Incoming::Upgrade(raw) => assert_eq!(raw.token(), Some(b"^n:ds[4U")),
            other => panic!("expected upgrade, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_plain_http_consumes_no_body() {
        let mut cursor = Cursor::new(&b"GET /index.html HTTP/1.1\r\nHost: h\r\n\r\nbody"[..]);
        match detect_request(&mut cursor).unwrap() {
            Incoming::PlainHttp { path, headers } => {
                assert_eq!(path, "/index.html");
                assert_eq!(headers.get("Host"), Some("h"));
                assert!(headers.token().is_none());
            }
            other => panic!("expected plain HTTP, got {:?}", other),
        }
        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"body");
    }

    #[test]
    fn test_detect_requires_both_upgrade_headers() {
        let mut cursor =
            Cursor::new(&b"GET / HTTP/1.1\r\nUpgrade: WebSocket\r\n\r\n12345678"[..]);
        assert!(matches!(
            detect_request(&mut cursor).unwrap(),
            Incoming::PlainHttp { .. }
        ));
    }
}
