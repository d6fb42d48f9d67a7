//! Product (workspace) records.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::errors::ApiError;

use super::decode_items;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub reference_prefix: Option<String>,
}

/// Lists every product visible to the token, across all pages.
pub async fn list(client: &ApiClient) -> Result<Vec<Product>, ApiError> {
    let items = client.fetch_all_pages("/products", "products", None).await?;
    decode_items(items)
}
