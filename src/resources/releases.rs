//! Release records.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::errors::ApiError;

use super::decode_items;

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: String,
    pub reference_num: Option<String>,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub parking_lot: bool,
}

/// Lists every release in a product, across all pages.
pub async fn list_for_product(
    client: &ApiClient,
    product_id: &str,
) -> Result<Vec<Release>, ApiError> {
    let path = format!("/products/{product_id}/releases");
    let items = client.fetch_all_pages(&path, "releases", None).await?;
    decode_items(items)
}
