use serde::{Deserialize, Serialize};

/// A `txlist` record as the explorer reports it. Numeric fields stay as
/// decimal strings until aggregation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas: String,
    pub gas_price: String,
    #[serde(default)]
    pub is_error: String,
    #[serde(default)]
    pub cumulative_gas_used: String,
    pub gas_used: String,
}

impl Transaction {
    /// Failed when `isError` parses to a nonzero integer. Missing or garbled
    /// flags count as success.
    pub fn failed(&self) -> bool {
        self.is_error
            .trim()
            .parse::<i64>()
            .map(|flag| flag != 0)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasStats {
    /// Total fee in whole native-token units.
    pub gas_fee_native: f64,
    pub gas_fiat: f64,
    pub fiat_symbol: String,
    pub total_gas: u128,
    pub total_tx: usize,
    /// Mean gas price in gwei.
    pub gas_per_tx: f64,
    pub failed_txs: usize,
    pub failed_cost: f64,
}
