use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gas-ledger", version, about = "Gas spend statistics for a wallet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute gas stats for a wallet once and print them
    Stats {
        #[arg(long)]
        address: String,
    },
    /// Bind a wallet to the presenter and print every view until it settles
    Watch {
        #[arg(long)]
        address: String,
    },
    /// Run the HTTP API server
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
}
