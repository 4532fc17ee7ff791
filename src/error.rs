pub type Result<T> = std::result::Result<T, GasError>;

#[derive(thiserror::Error, Debug)]
pub enum GasError {
    /// Transport failure, non-JSON body, or an upstream `error` field.
    #[error("request failed: {0}")]
    Request(String),
    #[error("bad response: {0}")]
    BadResponse(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no {currency} quote for {asset}")]
    MissingQuote { asset: String, currency: String },
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("gas used/price length mismatch: {used} vs {prices}")]
    LengthMismatch { used: usize, prices: usize },
    #[error("arithmetic overflow while summing {0}")]
    Overflow(&'static str),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for GasError {
    fn from(err: reqwest::Error) -> Self {
        GasError::Request(err.to_string())
    }
}
