//! Echo server configuration (`hixie-echo.toml`).
//!
//! Every field is optional:
//!
//! ```toml
//! bind = "0.0.0.0:9160"
//! read_timeout_ms = 30000
//! max_frame_bytes = 65536
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:9160";
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EchoConfig {
    /// Listen address.
    pub bind: String,
    /// Per-read socket timeout. `None` blocks forever.
    pub read_timeout_ms: Option<u64>,
    /// Frames longer than this end the session.
    pub max_frame_bytes: usize,
}

impl Default for EchoConfig {
    fn default() -> Self {
        EchoConfig {
            bind: DEFAULT_BIND.to_string(),
            read_timeout_ms: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl EchoConfig {
    pub fn from_file(path: &Path) -> Result<EchoConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<EchoConfig, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}
