//! Draft-76 WebSocket echo server.
//!
//! - [`config`]: TOML configuration with defaults for every field
//! - [`server`]: Accept loop and per-connection echo session

pub mod config;
pub mod server;

pub use config::{ConfigError, EchoConfig};
pub use server::{handle_connection, serve};
