use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{GasError, Result};
use crate::fetch::fetch_json;

/// `{ "<asset>": { "<currency>": price } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Quote>>;

/// Some deployments quote numbers, others stringified numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Quote {
    Number(f64),
    String(String),
}

impl Quote {
    fn into_f64(self) -> Result<f64> {
        match self {
            Quote::Number(n) => Ok(n),
            Quote::String(s) => s.trim().parse().map_err(|_| GasError::InvalidNumber {
                field: "spot price",
                value: s,
            }),
        }
    }
}

/// Client for a CoinGecko-compatible `simple/price` endpoint.
#[derive(Clone, Debug)]
pub struct PriceClient {
    client: reqwest::Client,
    api_url: Url,
}

impl PriceClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.price_api_url.clone(),
        }
    }

    pub fn simple_price_url(&self, asset: &str, currency: &str) -> Result<Url> {
        let base = self.api_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/simple/price"))?;
        url.query_pairs_mut()
            .append_pair("ids", asset)
            .append_pair("vs_currencies", currency);
        Ok(url)
    }

    /// Current price of one `asset` unit in `currency`.
    pub async fn spot_price(&self, asset: &str, currency: &str) -> Result<f64> {
        let url = self.simple_price_url(asset, currency)?;
        let response: SimplePriceResponse = fetch_json(&self.client, url).await?;
        pick_quote(response, asset, currency)
    }
}

fn pick_quote(mut response: SimplePriceResponse, asset: &str, currency: &str) -> Result<f64> {
    let missing = || GasError::MissingQuote {
        asset: asset.to_string(),
        currency: currency.to_string(),
    };
    let mut quotes = response.remove(asset).ok_or_else(missing)?;
    let price = quotes.remove(currency).ok_or_else(missing)?.into_f64()?;
    if !price.is_finite() || price < 0.0 {
        return Err(GasError::InvalidNumber {
            field: "spot price",
            value: price.to_string(),
        });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::decode_body;

    #[test]
    fn url_joins_base_path() {
        let config = Config {
            price_api_url: Url::parse("https://prices.test/api/v3/").unwrap(),
            ..Config::default()
        };
        let client = PriceClient::new(reqwest::Client::new(), &config);
        let url = client.simple_price_url("shiden", "usd").unwrap();
        assert_eq!(
            url.as_str(),
            "https://prices.test/api/v3/simple/price?ids=shiden&vs_currencies=usd"
        );
    }

    #[test]
    fn accepts_numeric_and_string_quotes() {
        let numeric: SimplePriceResponse = decode_body(r#"{"shiden":{"usd":0.25}}"#).unwrap();
        assert_eq!(pick_quote(numeric, "shiden", "usd").unwrap(), 0.25);

        let stringly: SimplePriceResponse = decode_body(r#"{"shiden":{"usd":"1.5"}}"#).unwrap();
        assert_eq!(pick_quote(stringly, "shiden", "usd").unwrap(), 1.5);
    }

    #[test]
    fn missing_asset_or_currency() {
        let response: SimplePriceResponse = decode_body(r#"{"shiden":{"eur":0.2}}"#).unwrap();
        let err = pick_quote(response, "shiden", "usd").unwrap_err();
        assert!(matches!(err, GasError::MissingQuote { .. }));

        let response: SimplePriceResponse = decode_body("{}").unwrap();
        let err = pick_quote(response, "shiden", "usd").unwrap_err();
        assert!(matches!(err, GasError::MissingQuote { .. }));
    }

    #[test]
    fn garbled_quote_is_invalid_number() {
        let response: SimplePriceResponse = decode_body(r#"{"shiden":{"usd":"n/a"}}"#).unwrap();
        let err = pick_quote(response, "shiden", "usd").unwrap_err();
        assert!(matches!(err, GasError::InvalidNumber { field: "spot price", .. }));
    }
}
