use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const DEFAULT_EXPLORER_API_URL: &str = "https://blockscout.com/astar/shiden/api";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone)]
pub struct Config {
    pub explorer_api_url: Url,
    pub explorer_api_key: Option<String>,
    pub price_api_url: Url,
    pub asset_id: String,
    pub fiat_currency: String,
    pub start_block: u64,
    pub end_block: u64,
    pub loading_floor: Duration,
    pub request_timeout: Option<Duration>,
    pub http_bind_addr: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("invalid {name} url: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("START_BLOCK ({start}) is past END_BLOCK ({end})")]
    BlockRange { start: u64, end: u64 },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            explorer_api_url: Url::parse(DEFAULT_EXPLORER_API_URL).expect("valid default url"),
            explorer_api_key: None,
            price_api_url: Url::parse(DEFAULT_PRICE_API_URL).expect("valid default url"),
            asset_id: "shiden".to_string(),
            fiat_currency: "usd".to_string(),
            start_block: 33_333,
            end_block: 99_999_999,
            loading_floor: Duration::from_millis(500),
            request_timeout: None,
            http_bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let explorer_api_url = match env::var("EXPLORER_API_URL") {
            Ok(raw) => parse_url("EXPLORER_API_URL", &raw)?,
            Err(_) => defaults.explorer_api_url,
        };
        let explorer_api_key = env::var("EXPLORER_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let price_api_url = match env::var("PRICE_API_URL") {
            Ok(raw) => parse_url("PRICE_API_URL", &raw)?,
            Err(_) => defaults.price_api_url,
        };
        let asset_id = env::var("PRICE_ASSET_ID")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or(defaults.asset_id);
        let fiat_currency = env::var("FIAT_CURRENCY")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or(defaults.fiat_currency);
        let start_block = number_var("START_BLOCK")?.unwrap_or(defaults.start_block);
        let end_block = number_var("END_BLOCK")?.unwrap_or(defaults.end_block);
        if start_block > end_block {
            return Err(ConfigError::BlockRange {
                start: start_block,
                end: end_block,
            });
        }
        let loading_floor = number_var("LOADING_FLOOR_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.loading_floor);
        let request_timeout = number_var("REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        let http_bind_addr = env::var("HTTP_BIND").unwrap_or(defaults.http_bind_addr);

        Ok(Self {
            explorer_api_url,
            explorer_api_key,
            price_api_url,
            asset_id,
            fiat_currency,
            start_block,
            end_block,
            loading_floor,
            request_timeout,
            http_bind_addr,
        })
    }
}

fn number_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_number(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shiden_setup() {
        let config = Config::default();
        assert_eq!(config.start_block, 33_333);
        assert_eq!(config.end_block, 99_999_999);
        assert_eq!(config.asset_id, "shiden");
        assert_eq!(config.loading_floor, Duration::from_millis(500));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number::<u64>("START_BLOCK", " 42 ").unwrap(), 42);
        let err = parse_number::<u64>("START_BLOCK", "forty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "START_BLOCK", .. }));
    }

    #[test]
    fn parse_url_reports_variable_name() {
        let err = parse_url("PRICE_API_URL", "not a url").unwrap_err();
        assert!(err.to_string().contains("PRICE_API_URL"));
    }
}
