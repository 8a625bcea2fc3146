use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::catalog::{CatalogClient, CatalogError, CatalogItem};
use crate::db::{RecordStore, StoreError};
use crate::entities::search_record;
use crate::models::record::SearchRecord;

/// Relays a search term to the external catalog and persists every returned
/// item. Each invocation is an independent best-effort batch: no retries, no
/// cross-call state.
pub struct SearchService {
    store: Arc<dyn RecordStore>,
    catalog: CatalogClient,
}

impl SearchService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, catalog: CatalogClient) -> Self {
        Self { store, catalog }
    }

    /// Query the catalog and upsert every item, in catalog order.
    ///
    /// A catalog-level failure (bad status, transport error, malformed body)
    /// fails the whole call; the HTTP boundary decides how to map it. A
    /// failed upsert only drops that one item from the result.
    pub async fn search_and_save(
        &self,
        term: &str,
    ) -> Result<Vec<search_record::Model>, CatalogError> {
        let items = self.catalog.search(term).await?;
        debug!("Catalog returned {} items for '{}'", items.len(), term);

        Ok(self.upsert_items(&items).await)
    }

    /// Sequential fold over the batch. One bad item must not abort the rest.
    async fn upsert_items(&self, items: &[CatalogItem]) -> Vec<search_record::Model> {
        let search_date = chrono::Utc::now().to_rfc3339();

        let mut stored = Vec::with_capacity(items.len());

        for item in items {
            let record = SearchRecord::from_catalog_item(item, search_date.clone());
            let id = record.id;

            match self.store.upsert_record(record).await {
                Ok(row) => stored.push(row),
                Err(e) => {
                    metrics::counter!("record_upsert_failures_total").increment(1);
                    match e {
                        StoreError::Unavailable(_) => {
                            warn!("Store unavailable, skipping record {}: {}", id, e);
                        }
                        StoreError::Write(_) => {
                            warn!("Skipping record {}: {}", id, e);
                        }
                    }
                }
            }
        }

        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::DbErr;
    use std::collections::HashSet;

    /// In-memory store that rejects a chosen set of ids.
    struct FlakyStore {
        rejected_ids: HashSet<i64>,
    }

    #[async_trait]
    impl RecordStore for FlakyStore {
        async fn upsert_record(
            &self,
            record: SearchRecord,
        ) -> Result<search_record::Model, StoreError> {
            if self.rejected_ids.contains(&record.id) {
                return Err(StoreError::Write(DbErr::Custom("disk full".to_string())));
            }

            Ok(search_record::Model {
                id: record.id,
                kind: record.kind,
                artist_name: record.artist_name,
                collection_name: record.collection_name,
                collection_view_url: record.collection_view_url,
                image: record.image,
                search_date: record.search_date,
            })
        }
    }

    fn item(track_id: i64, artist: &str) -> CatalogItem {
        let body = serde_json::json!({
            "trackId": track_id,
            "kind": "song",
            "artistName": artist,
        });
        serde_json::from_value(body).unwrap()
    }

    fn service(rejected_ids: HashSet<i64>) -> SearchService {
        let catalog = CatalogClient::new(&crate::config::CatalogConfig::default()).unwrap();
        SearchService::new(Arc::new(FlakyStore { rejected_ids }), catalog)
    }

    #[tokio::test]
    async fn test_one_rejected_item_does_not_abort_the_batch() {
        let service = service(HashSet::from([2]));
        let items = vec![item(1, "A"), item(2, "B"), item(3, "C")];

        let stored = service.upsert_items(&items).await;

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, 1);
        assert_eq!(stored[1].id, 3);
    }

    #[tokio::test]
    async fn test_results_preserve_catalog_order() {
        let service = service(HashSet::new());
        let items = vec![item(30, "C"), item(10, "A"), item(20, "B")];

        let stored = service.upsert_items(&items).await;

        let ids: Vec<i64> = stored.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_all_items_rejected_yields_empty_batch() {
        let service = service(HashSet::from([1, 2]));
        let items = vec![item(1, "A"), item(2, "B")];

        let stored = service.upsert_items(&items).await;

        assert!(stored.is_empty());
    }
}
