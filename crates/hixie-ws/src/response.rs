//! `101 WebSocket Protocol Handshake` response.
//!
//! The header block is CRLF-terminated text; the 16-byte challenge digest
//! follows the blank line as raw binary with nothing after it.

use std::io::Write;

use crate::error::HandshakeError;
use crate::request::Request;

/// Subprotocol advertised in every accepted handshake.
pub const PROTOCOL: &str = "sample";

/// Serialize the full acceptance response for `request`.
pub fn build_response(request: &Request) -> Vec<u8> {
    let head = format!(
        "HTTP/1.1 101 WebSocket Protocol Handshake\r\n\
         Upgrade: WebSocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Origin: {}\r\n\
         Sec-WebSocket-Location: ws://{}{}\r\n\
         Sec-WebSocket-Protocol: {}\r\n\
         \r\n",
        request.origin(),
        request.host(),
        request.path(),
        PROTOCOL
    );
    let mut response = head.into_bytes();
    response.extend_from_slice(&request.digest());
    response
}

/// Write the acceptance response and flush.
pub fn write_response<W: Write>(stream: &mut W, request: &Request) -> Result<(), HandshakeError> {
    stream.write_all(&build_response(request))?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{validate, RawRequest};

    fn sample_request() -> Request {
        let mut raw = RawRequest::new("/demo");
        raw.insert("Host", "example.com");
        raw.insert("Origin", "http://example.com");
        raw.insert("Sec-WebSocket-Key1", "4 @1  46546xW%0l 1 5");
        raw.insert("Sec-WebSocket-Key2", "12998 5 Y3 1  .P00");
        raw.set_token(*b"^n:ds[4U");
        validate(raw).unwrap()
    }

    #[test]
    fn test_response_head() {
        let response = build_response(&sample_request());
        let (head, digest) = response.split_at(response.len() - 16);
        let head = String::from_utf8(head.to_vec()).unwrap();
        assert!(head.ends_with("\r\n\r\n"));
        insta::assert_snapshot!(head.replace("\r\n", "\n"), @r"
        HTTP/1.1 101 WebSocket Protocol Handshake
        Upgrade: WebSocket
        Connection: Upgrade
        Sec-WebSocket-Origin: http://example.com
        Sec-WebSocket-Location: ws://example.com/demo
        Sec-WebSocket-Protocol: sample
        ");
        assert_eq!(digest, b"8jKS'y:G*Co,Wxa-");
    }

    #[test]
    fn test_digest_is_raw_binary() {
        let request = sample_request();
        let response = build_response(&request);
        assert_eq!(&response[response.len() - 16..], &request.digest());
    }

    #[test]
    fn test_write_response_flushes() {
        struct Sink {
            data: Vec<u8>,
            flushed: bool,
        }
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                self.flushed = true;
                Ok(())
            }
        }

        let request = sample_request();
        let mut sink = Sink { data: Vec::new(), flushed: false };
        write_response(&mut sink, &request).unwrap();
        assert_eq!(sink.data, build_response(&request));
        assert!(sink.flushed);
    }

    #[test]
    fn test_write_failure_is_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_response(&mut Broken, &sample_request()).unwrap_err();
        assert_eq!(err, HandshakeError::IOError("pipe closed".to_string()));
    }
}
