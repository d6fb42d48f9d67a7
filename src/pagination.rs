//! Transparent aggregation of paginated API collections.
//!
//! Aha! list endpoints wrap each page in an envelope carrying a
//! resource-named array ("features", "releases", ...) and a `pagination`
//! object. This module walks those pages so resource functions never write
//! their own pagination loops.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::ApiError;

/// Page bookkeeping reported by the API inside each envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub total_pages: u64,
    pub current_page: u64,
}

impl Pagination {
    /// Whether another page exists after this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Drives `fetch_page` with increasing page numbers and concatenates the
/// arrays found under `array_key`, first page first.
///
/// An envelope without a `pagination` object counts as the only page, not as
/// an error. Pages are requested strictly sequentially - page N+1 is only
/// known to exist from page N's response.
pub async fn fetch_all_pages<F, Fut>(array_key: &str, fetch_page: F) -> Result<Vec<Value>, ApiError>
where
    F: Fn(u64) -> Fut,
    Fut: Future<Output = Result<Arc<Value>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page: u64 = 1;

    loop {
        let envelope = fetch_page(page).await?;

        match envelope.get(array_key).and_then(Value::as_array) {
            Some(chunk) => items.extend(chunk.iter().cloned()),
            None => warn!(array_key, page, "page envelope carried no collection array"),
        }

        let pagination = envelope
            .get("pagination")
            .and_then(|p| serde_json::from_value::<Pagination>(p.clone()).ok());

        match pagination {
            Some(p) if p.has_next() => page += 1,
            _ => return Ok(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let calls = AtomicUsize::new(0);

        let items = fetch_all_pages("features", |page| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                let envelope = match page {
                    1 => json!({
                        "features": [{"id": "f1"}],
                        "pagination": {"total_pages": 2, "current_page": 1},
                    }),
                    2 => json!({
                        "features": [{"id": "f2"}],
                        "pagination": {"total_pages": 2, "current_page": 2},
                    }),
                    _ => panic!("requested page {page} past the last"),
                };
                Ok(Arc::new(envelope))
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(items, vec![json!({"id": "f1"}), json!({"id": "f2"})]);
    }

    #[tokio::test]
    async fn missing_pagination_means_single_page() {
        let calls = AtomicUsize::new(0);

        let items = fetch_all_pages("products", |_page| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Arc::new(json!({"products": [{"id": "p1"}, {"id": "p2"}]}))) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn current_page_at_total_stops() {
        let items = fetch_all_pages("releases", |_page| async move {
            Ok(Arc::new(json!({
                "releases": [{"id": "r1"}],
                "pagination": {"total_pages": 1, "current_page": 1},
            })))
        })
        .await
        .unwrap();

        assert_eq!(items, vec![json!({"id": "r1"})]);
    }

    #[tokio::test]
    async fn missing_collection_array_contributes_nothing() {
        let items = fetch_all_pages("features", |_page| async move {
            Ok(Arc::new(json!({"unexpected": true})))
        })
        .await
        .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn page_error_propagates() {
        let result = fetch_all_pages("features", |_page| async move {
            Err(ApiError::from_status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "boom".to_string(),
                512,
            ))
        })
        .await;

        assert!(matches!(result, Err(ApiError::Api { .. })));
    }
}
