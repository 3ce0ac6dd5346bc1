//! Thread-per-connection echo server.
//!
//! ```text
//! TcpListener (accept loop on calling thread)
//!     |
//!     v  spawn thread per connection
//! handle_connection
//!     |
//!     +-- shake (draft-76 handshake, nothing written on rejection)
//!     +-- loop: decode_frame_limited -> write_frame
//!     +-- stop on empty payload (peer closed, truncated or oversized frame)
//! ```

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use hixie_ws::{decode_frame_limited, shake, write_frame, BufferedStream, HandshakeError};
use tracing::{debug, info, info_span, warn};

use crate::config::EchoConfig;

/// Accept connections forever, one thread each.
pub fn serve(listener: TcpListener, config: EchoConfig) -> io::Result<()> {
    let config = Arc::new(config);
    info!(addr = %listener.local_addr()?, "echo server listening");

    for conn in listener.incoming() {
        let tcp = match conn {
            Ok(tcp) => tcp,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        let config = Arc::clone(&config);
        thread::spawn(move || run_session(tcp, &config));
    }
    Ok(())
}

fn run_session(tcp: TcpStream, config: &EchoConfig) {
    let peer = tcp
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let _span = info_span!("session", %peer).entered();

    if let Err(e) = tcp.set_read_timeout(config.read_timeout()) {
        warn!(error = %e, "failed to set read timeout");
    }

    match handle_connection(tcp, config) {
        Ok(echoed) => info!(echoed = echoed, "session closed"),
        Err(e) => info!(error = %e, "handshake failed"),
    }
}

/// Run the handshake and echo frames until the peer goes away.
///
/// Returns the number of frames echoed.
pub fn handle_connection<S: Read + Write>(
    transport: S,
    config: &EchoConfig,
) -> Result<usize, HandshakeError> {
    let mut stream = BufferedStream::new(transport);
    let request = shake(&mut stream)?;
    info!(
        host = request.host(),
        path = request.path(),
        origin = request.origin(),
        "websocket open"
    );

    let mut echoed = 0;
    loop {
        let payload = decode_frame_limited(&mut stream, config.max_frame_bytes);
        if payload.is_empty() {
            return Ok(echoed);
        }
        debug!(len = payload.len(), "frame");
        if let Err(e) = write_frame(&mut stream, &payload) {
            debug!(error = %e, "echo write failed");
            return Ok(echoed);
        }
        echoed += 1;
    }
}
