//! User records and the identity lookup.

use serde::Deserialize;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;

use super::{decode_items, decode_wrapped};

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Lists every user in the account, across all pages.
pub async fn list(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    let items = client.fetch_all_pages("/users", "users", None).await?;
    decode_items(items)
}

/// The user the token authenticates as. Identity changes rarely, so the
/// response is cached under the longer identity TTL.
pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    let envelope = client
        .request(
            "/me",
            RequestOptions {
                cache_ttl: Some(client.config().identity_cache_ttl),
                ..Default::default()
            },
        )
        .await?;
    decode_wrapped(&envelope, "user")
}
