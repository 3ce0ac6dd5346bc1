//! Sentinel-delimited frame codec.
//!
//! A frame on the wire is `0x00`, the payload, then `0xFF`. There is no
//! length field and no escaping, so payloads must not contain `0xFF`.
//!
//! - [`encode_frame`]: Wrap a payload in sentinels
//! - [`write_frame`]: Encode, write and flush
//! - [`decode_frame`]: Read one frame; an empty result means the stream closed
//! - [`decode_frame_limited`]: Same, giving up on payloads over a size cap
//!
//! Decoding never fails. A closed stream, a read error, or a frame cut off
//! before its `0xFF` all produce an empty payload. A frame that does not
//! start with `0x00` is accepted, its first byte counting as payload.

use std::io::{self, Read, Write};

use tracing::debug;

/// Start-of-frame sentinel.
pub const FRAME_START: u8 = 0x00;
/// End-of-frame sentinel.
pub const FRAME_END: u8 = 0xFF;

/// `0x00 ++ payload ++ 0xFF`.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 2);
    frame.push(FRAME_START);
    frame.extend_from_slice(payload);
    frame.push(FRAME_END);
    frame
}

/// Write one frame and flush it.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    writer.write_all(&encode_frame(payload))?;
    writer.flush()
}

/// Read one frame's payload.
///
/// Reads a byte at a time; wrap raw sockets in a buffered reader.
pub fn decode_frame<R: Read>(stream: &mut R) -> Vec<u8> {
    decode_frame_limited(stream, usize::MAX)
}

/// Read one frame's payload, returning empty if it grows past `max_len` bytes.
///
/// On overflow the rest of the oversized frame is left unread.
pub fn decode_frame_limited<R: Read>(stream: &mut R, max_len: usize) -> Vec<u8> {
    let mut bytes = stream.bytes();
    let mut next_byte = || match bytes.next() {
        Some(Ok(byte)) => Some(byte),
        _ => None,
    };

    let mut payload = match next_byte() {
        None => return Vec::new(),
        Some(FRAME_START) => Vec::new(),
        Some(byte) => {
            debug!(byte = byte, "frame without start sentinel");
            vec![byte]
        }
    };

    loop {
        match next_byte() {
            None => {
                if !payload.is_empty() {
                    debug!(len = payload.len(), "stream closed mid-frame, dropping payload");
                }
                return Vec::new();
            }
            Some(FRAME_END) => return payload,
            Some(byte) => {
                if payload.len() >= max_len {
                    debug!(max_len = max_len, "frame exceeds size limit");
                    return Vec::new();
                }
                payload.push(byte);
            }
        }
    }
}
