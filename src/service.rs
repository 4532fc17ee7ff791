use async_trait::async_trait;
use ethers_core::types::Address;
use tracing::debug;

use crate::aggregate::summarize;
use crate::config::Config;
use crate::error::Result;
use crate::explorer::ExplorerClient;
use crate::models::GasStats;
use crate::price::PriceClient;

/// Anything that can produce gas statistics for a wallet.
#[async_trait]
pub trait StatsSource: Send + Sync + 'static {
    async fn gas_stats(&self, address: Address) -> Result<GasStats>;
}

/// Explorer history + spot price, fetched one after the other.
#[derive(Clone, Debug)]
pub struct GasService {
    explorer: ExplorerClient,
    price: PriceClient,
    asset_id: String,
    fiat_currency: String,
}

impl GasService {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            explorer: ExplorerClient::new(client.clone(), config),
            price: PriceClient::new(client, config),
            asset_id: config.asset_id.clone(),
            fiat_currency: config.fiat_currency.clone(),
        }
    }
}

#[async_trait]
impl StatsSource for GasService {
    async fn gas_stats(&self, address: Address) -> Result<GasStats> {
        let txs = self.explorer.transactions(&address).await?;
        debug!(?address, count = txs.len(), "fetched transaction history");
        let price = self
            .price
            .spot_price(&self.asset_id, &self.fiat_currency)
            .await?;
        summarize(&txs, price, &self.fiat_currency)
    }
}
