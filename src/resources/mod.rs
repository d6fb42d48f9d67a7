//! Resource-level wrappers over the API surface.
//!
//! Each function is thin glue: build the path, ride through
//! [`ApiClient::request`](crate::client::ApiClient) or
//! [`fetch_all_pages`](crate::client::ApiClient::fetch_all_pages), and map
//! the envelope into a typed model. Mutations finish by invalidating every
//! cache pattern they could have staled.

pub mod features;
pub mod products;
pub mod releases;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiError;

/// Decodes a list of raw envelope items into typed models.
pub(crate) fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ApiError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

/// Decodes the single resource wrapped under `key` in a response envelope,
/// e.g. the `feature` object in `{"feature": {...}}`.
pub(crate) fn decode_wrapped<T: DeserializeOwned>(
    envelope: &Value,
    key: &str,
) -> Result<T, ApiError> {
    let inner = envelope.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(inner).map_err(ApiError::from)
}
