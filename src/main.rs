mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ethers_core::types::Address;

use gas_ledger::api::{self, AppState};
use gas_ledger::config::Config;
use gas_ledger::presenter::{Presenter, View};
use gas_ledger::render;
use gas_ledger::service::{GasService, StatsSource};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let service = GasService::new(&config).context("failed to build http client")?;

    match cli.command {
        Commands::Stats { address } => {
            let address = parse_address(&address)?;
            let view = match service.gas_stats(address).await {
                Ok(stats) => View::Populated { address, stats },
                Err(err) => {
                    tracing::warn!("gas stats failed: {}", err);
                    View::Failed {
                        address,
                        message: err.to_string(),
                    }
                }
            };
            print!("{}", render::page(&view));
        }
        Commands::Watch { address } => {
            let address = parse_address(&address)?;
            let presenter = Presenter::new(Arc::new(service), config.loading_floor);
            let mut rx = presenter.subscribe();
            print!("{}", render::page(&rx.borrow_and_update()));

            presenter.connect(address, true);
            loop {
                rx.changed().await.context("presenter closed")?;
                let view = rx.borrow_and_update().clone();
                print!("{}", render::page(&view));
                if view.is_settled() {
                    break;
                }
            }
        }
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            let state = AppState::new(service, config.loading_floor);
            api::run_http_server(&bind, state).await?;
        }
    }

    Ok(())
}

fn parse_address(raw: &str) -> anyhow::Result<Address> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid wallet address {raw:?}"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
