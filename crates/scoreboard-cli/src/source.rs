//! Opportunity data source adapter
//!
//! Loads the opportunity payload from a JSON file or an HTTP endpoint and
//! reduces every failure (I/O, HTTP status, decoding, error payloads) to a
//! single `FetchError` for the scoreboard.

use scoreboard::{FetchError, RawOpportunity};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::config::Source;

/// Fetch opportunities from the configured source
pub async fn fetch(source: &Source, timeout: Duration) -> Result<Vec<RawOpportunity>, FetchError> {
    let result = match source {
        Source::File(path) => load_from_file(path),
        Source::Url(url) => fetch_from_url(url, timeout).await,
    };

    match &result {
        Ok(records) => tracing::info!(count = records.len(), "loaded opportunities"),
        Err(error) => tracing::warn!(%error, status = ?error.status, "opportunity fetch failed"),
    }

    result
}

/// Load opportunities from a JSON file
pub fn load_from_file(path: &Path) -> Result<Vec<RawOpportunity>, FetchError> {
    tracing::debug!(path = %path.display(), "reading opportunity payload");

    let text = std::fs::read_to_string(path)
        .map_err(|e| FetchError::new(format!("Failed to read {}: {}", path.display(), e)))?;

    parse_payload(&text)
}

/// GET opportunities from an HTTP endpoint
pub async fn fetch_from_url(url: &str, timeout: Duration) -> Result<Vec<RawOpportunity>, FetchError> {
    tracing::debug!(url, "requesting opportunity payload");

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::new(format!("Failed to build HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| FetchError::new(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let mut error = FetchError::new(format!("HTTP error: {}", status)).with_status(status.as_u16());
        if let Ok(details) = response.json::<Value>().await {
            error = error.with_details(details);
        }
        return Err(error);
    }

    let payload = response
        .json::<Value>()
        .await
        .map_err(|e| FetchError::new(format!("Invalid opportunity payload: {}", e)).with_status(status.as_u16()))?;

    records_from_value(payload)
}

/// Decode a payload into records or the error it carries
pub fn parse_payload(text: &str) -> Result<Vec<RawOpportunity>, FetchError> {
    let payload: Value =
        serde_json::from_str(text).map_err(|e| FetchError::new(format!("Invalid opportunity payload: {}", e)))?;

    records_from_value(payload)
}

/// Accepts a bare array of records or a `{ data }` / `{ error }` envelope
fn records_from_value(payload: Value) -> Result<Vec<RawOpportunity>, FetchError> {
    match payload {
        Value::Array(items) => Ok(decode_records(items)),
        Value::Object(mut envelope) => {
            // Data wins if a source sends both
            match (envelope.remove("data"), envelope.remove("error")) {
                (Some(Value::Array(items)), _) => Ok(decode_records(items)),
                (Some(data), _) if !data.is_null() => {
                    Err(FetchError::new("Payload data is not a list of records").with_details(data))
                }
                (_, Some(error)) if !error.is_null() => Err(error_from_value(error)),
                _ => Err(FetchError::new("Payload contained neither data nor error")),
            }
        }
        other => Err(FetchError::new("Unexpected opportunity payload").with_details(other)),
    }
}

/// Decode each record on its own so one malformed entry only drops itself
fn decode_records(items: Vec<Value>) -> Vec<RawOpportunity> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::warn!(index, "skipping opportunity record that is not an object");
                return None;
            }
            match serde_json::from_value::<RawOpportunity>(item) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(index, %error, "skipping undecodable opportunity record");
                    None
                }
            }
        })
        .collect()
}

/// Build a `FetchError` from an error object, keeping the object verbatim
///
/// Understands the common `{ "message": .. }` and
/// `{ "status": .., "body": { "message": .. } }` shapes.
fn error_from_value(value: Value) -> FetchError {
    let message = value
        .get("message")
        .or_else(|| value.pointer("/body/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| value.as_str().map(str::to_string))
        .unwrap_or_else(|| value.to_string());

    let status = value
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());

    let mut error = FetchError::new(message);
    if let Some(status) = status {
        error = error.with_status(status);
    }
    error.with_details(value)
}
