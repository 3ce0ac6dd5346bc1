//! The `hixie-echo` command.
//!
//! Options:
//! - `--config` - Path to a TOML config file
//! - `--bind` - Listen address (overrides the config file)
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::net::TcpListener;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hixie_echo::{serve, EchoConfig};

#[derive(Parser)]
#[command(name = "hixie-echo", version, about = "Draft-76 WebSocket echo server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:9160
    #[arg(short, long)]
    bind: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => EchoConfig::from_file(path).map_err(|e| e.to_string())?,
        None => EchoConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let listener = TcpListener::bind(&config.bind)
        .map_err(|e| format!("Failed to bind {}: {}", config.bind, e))?;
    serve(listener, config).map_err(|e| format!("Server stopped: {}", e))
}
