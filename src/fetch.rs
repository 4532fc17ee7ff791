use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, trace};
use url::Url;

use crate::error::{GasError, Result};

/// GET `url` and decode the JSON body. A body carrying a top-level `error`
/// field is turned into [`GasError::Request`].
pub async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: Url) -> Result<T> {
    trace!(target: "gas_ledger::fetch", "GET {}", url);
    let body = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?
        .text()
        .await?;
    decode_body(&body)
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        error!(target: "gas_ledger::fetch", ?body, "response is not JSON: {}", err);
        GasError::Request(format!("response is not JSON: {err}"))
    })?;

    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(GasError::Request(message));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn error_field_becomes_request_error() {
        let err = decode_body::<Value>(r#"{"error":"rate limited"}"#).unwrap_err();
        match err {
            GasError::Request(msg) => assert_eq!(msg, "rate limited"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn structured_error_field_is_stringified() {
        let err = decode_body::<Value>(r#"{"error":{"code":429}}"#).unwrap_err();
        assert!(matches!(err, GasError::Request(msg) if msg.contains("429")));
    }

    #[test]
    fn null_error_field_is_ignored() {
        let out: HashMap<String, Value> = decode_body(r#"{"error":null,"ok":1}"#).unwrap();
        assert_eq!(out.get("ok"), Some(&Value::from(1)));
    }

    #[test]
    fn non_json_body_is_request_error() {
        let err = decode_body::<Value>("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, GasError::Request(_)));
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let err = decode_body::<Vec<u64>>(r#"{"status":"1"}"#).unwrap_err();
        assert!(matches!(err, GasError::Decode(_)));
    }
}
