//! Draft-76 ("hixie-76") WebSocket server handshake and framing.
//!
//! Works over any blocking byte stream: the handshake needs `BufRead + Write`,
//! frame decoding needs `Read`. Accepting connections and scheduling them
//! across threads is left to the caller.
//!
//! ## Modules
//!
//! - [`parse`]: Request line, headers, and the 8-byte client token
//! - [`request`]: Raw header map, validation, the immutable [`Request`]
//! - [`token`]: Security-key numbers and the MD5 challenge digest
//! - [`response`]: The `101 WebSocket Protocol Handshake` response
//! - [`handshake`]: Parse, validate, respond
//! - [`frame`]: `0x00 payload 0xFF` frame codec
//! - [`stream`]: Buffered stream handle shared by handshake and frame phases
//!
//! ## Example
//!
//! ```no_run
//! use std::net::TcpListener;
//! use hixie_ws::{decode_frame, shake, write_frame, BufferedStream};
//!
//! let listener = TcpListener::bind("127.0.0.1:9160").unwrap();
//! let (tcp, _) = listener.accept().unwrap();
//! let mut stream = BufferedStream::new(tcp);
//! if shake(&mut stream).is_ok() {
//!     loop {
//!         let payload = decode_frame(&mut stream);
//!         if payload.is_empty() {
//!             break;
//!         }
//!         write_frame(&mut stream, &payload).unwrap();
//!     }
//! }
//! ```

pub mod error;
pub mod frame;
pub mod handshake;
pub mod parse;
pub mod request;
pub mod response;
pub mod stream;
pub mod token;

pub use error::HandshakeError;
pub use frame::{decode_frame, decode_frame_limited, encode_frame, write_frame};
pub use handshake::{shake, shake_or_plain, Negotiated};
pub use parse::{detect_request, parse_request, Incoming};
pub use request::{validate, RawRequest, Request};
pub use response::{build_response, write_response};
pub use stream::BufferedStream;
pub use token::derive;
