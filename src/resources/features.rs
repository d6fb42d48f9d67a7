//! Feature records and the score mutation.

use serde::Deserialize;
use serde_json::json;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;

use super::{decode_items, decode_wrapped};

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub id: String,
    pub reference_num: Option<String>,
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub workflow_status: Option<WorkflowStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowStatus {
    pub id: String,
    pub name: String,
}

/// Lists every feature in a release, across all pages.
pub async fn list_for_release(
    client: &ApiClient,
    release_id: &str,
) -> Result<Vec<Feature>, ApiError> {
    let path = format!("/releases/{release_id}/features");
    let items = client.fetch_all_pages(&path, "features", None).await?;
    decode_items(items)
}

/// Fetches a single feature.
pub async fn get(client: &ApiClient, feature_id: &str) -> Result<Feature, ApiError> {
    let path = format!("/features/{feature_id}");
    let envelope = client.request(&path, RequestOptions::default()).await?;
    decode_wrapped(&envelope, "feature")
}

/// Updates a feature's score, then drops the cached reads the write could
/// have staled: the feature's own entry plus every release-scoped list,
/// since those embed the feature.
pub async fn update_score(
    client: &ApiClient,
    feature_id: &str,
    score: f64,
) -> Result<(), ApiError> {
    let path = format!("/features/{feature_id}");
    let body = json!({ "feature": { "score": score } });

    client
        .request(
            &path,
            RequestOptions {
                method: reqwest::Method::PUT,
                body: Some(body),
                cacheable: false,
                ..Default::default()
            },
        )
        .await?;

    client.invalidate(&format!("/features/{feature_id}"));
    client.invalidate("/releases/");
    Ok(())
}
