use ethers_core::types::Address;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{GasError, Result};
use crate::fetch::fetch_json;
use crate::models::Transaction;

/// Client for the Etherscan/Blockscout-compatible `account/txlist` endpoint.
#[derive(Clone, Debug)]
pub struct ExplorerClient {
    client: reqwest::Client,
    api_url: Url,
    api_key: Option<String>,
    start_block: u64,
    end_block: u64,
}

#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    result: TxListResult,
}

/// The explorer puts either the records or an error message in `result`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TxListResult {
    Transactions(Vec<Transaction>),
    Message(String),
}

impl ExplorerClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.explorer_api_url.clone(),
            api_key: config.explorer_api_key.clone(),
            start_block: config.start_block,
            end_block: config.end_block,
        }
    }

    pub fn txlist_url(&self, address: &Address) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("module", "account")
                .append_pair("action", "txlist")
                .append_pair("address", &format!("{address:?}"))
                .append_pair("startblock", &self.start_block.to_string())
                .append_pair("endblock", &self.end_block.to_string())
                .append_pair("sort", "asc");
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }

    /// Full ascending transaction history of `address` within the configured
    /// block range.
    pub async fn transactions(&self, address: &Address) -> Result<Vec<Transaction>> {
        let response: TxListResponse = fetch_json(&self.client, self.txlist_url(address)).await?;
        into_transactions(response)
    }
}

fn into_transactions(response: TxListResponse) -> Result<Vec<Transaction>> {
    match response.result {
        TxListResult::Transactions(txs) => Ok(txs),
        TxListResult::Message(result) => {
            let detail = match response.message {
                Some(message) if message != result => format!("{message}: {result}"),
                _ => result,
            };
            Err(GasError::BadResponse(format!(
                "txlist status {}: {}",
                response.status, detail
            )))
        }
    }
}
