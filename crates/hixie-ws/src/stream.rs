//! Buffered byte-stream handle shared by the handshake and the frame phase.
//!
//! The client's 8 token bytes follow the blank header line with no
//! terminator, and a client may pipeline its first frame right behind them.
//! Whatever the line reader buffered must stay available to the frame
//! decoder, so reads go through one `BufReader` for the life of the
//! connection while writes go straight to the transport.

use std::io::{self, BufRead, BufReader, Read, Write};

/// A `Read + Write` transport with buffered reads and unbuffered writes.
pub struct BufferedStream<S> {
    reader: BufReader<S>,
}

impl<S: Read + Write> BufferedStream<S> {
    pub fn new(inner: S) -> BufferedStream<S> {
        BufferedStream {
            reader: BufReader::new(inner),
        }
    }

    pub fn with_capacity(capacity: usize, inner: S) -> BufferedStream<S> {
        BufferedStream {
            reader: BufReader::with_capacity(capacity, inner),
        }
    }

    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    /// Direct access to the transport. Reading from it skips buffered bytes.
    pub fn get_mut(&mut self) -> &mut S {
        self.reader.get_mut()
    }

    /// Bytes already pulled off the transport but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        self.reader.buffer()
    }

    /// Unwrap the transport, discarding any buffered input.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

impl<S: Read> Read for BufferedStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<S: Read> BufRead for BufferedStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl<S: Write> Write for BufferedStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.reader.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.reader.get_mut().flush()
    }
}
