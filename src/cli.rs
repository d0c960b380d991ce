use clap::Parser;
use std::path::PathBuf;

use riskwatch::config::Overrides;

/// Serve the riskwatch risk and breach ledger over HTTP
#[derive(Parser, Debug)]
#[command(name = "riskwatch")]
#[command(version)]
#[command(
    about = "Serve the riskwatch risk and breach ledger over HTTP",
    long_about = None
)]
pub struct Args {
    /// Path to a config file (defaults to ./riskwatch.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// JSON snapshot file loaded at startup and written on shutdown
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            snapshot: self.snapshot.clone(),
        }
    }
}
