use clap::{Parser, Subcommand};

/// skyproxy: OpenSky Network proxy for the live flight map
#[derive(Parser)]
#[command(name = "skyproxy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server (default)
    Serve {
        /// Port to bind; overrides SKYPROXY_PORT
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Authenticate once against OpenSky and report the token expiry
    Token,
}
