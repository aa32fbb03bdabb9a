//! CLI entry point for the relay.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{BackendKind, PayloadFormat, RelayConfig};

/// Image relay server
#[derive(Parser, Debug)]
#[command(name = "image-relay", version, about = "Job-oriented relay for remote image editing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the resolved configuration and exit
    CheckConfig(ServeArgs),
}

/// Overrides applied on top of the environment.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Use the offline mock backend
    #[arg(long)]
    pub mock: bool,

    /// Outbound call timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Outbound payload shape (json or multipart)
    #[arg(long)]
    pub payload_format: Option<PayloadFormat>,
}

impl ServeArgs {
    /// Apply flags over `config`; flags win.
    pub fn apply(&self, mut config: RelayConfig) -> RelayConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.mock {
            config.backend = BackendKind::Mock;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(format) = self.payload_format {
            config.payload_format = format;
        }
        config
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
