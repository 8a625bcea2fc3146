use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::CatalogConfig;

/// All variants are fatal for the batch: the caller cannot partially recover
/// from a failed or malformed upstream response.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog response malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogSearchResponse {
    results: Vec<CatalogItem>,
}

/// One raw item as the upstream catalog returns it. Everything is optional;
/// normalization into a `SearchRecord` happens in one place.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "trackId")]
    pub track_id: Option<i64>,
    #[serde(rename = "collectionId")]
    pub collection_id: Option<i64>,
    pub kind: Option<String>,
    #[serde(rename = "artistName")]
    pub artist_name: Option<String>,
    #[serde(rename = "collectionName")]
    pub collection_name: Option<String>,
    #[serde(rename = "trackName")]
    pub track_name: Option<String>,
    #[serde(rename = "collectionViewUrl")]
    pub collection_view_url: Option<String>,
    #[serde(rename = "trackViewUrl")]
    pub track_view_url: Option<String>,
    #[serde(rename = "artworkUrl600")]
    pub artwork_url_600: Option<String>,
    #[serde(rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
}

#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    limit: u32,
    country: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .user_agent("Tunedex/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build catalog HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            limit: config.limit,
            country: config.country.clone(),
        }
    }

    /// One synchronous upstream query. Returns the raw items in upstream
    /// order; no retries, no paging.
    pub async fn search(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = format!(
            "{}?term={}&limit={}&country={}",
            self.base_url,
            urlencoding::encode(term),
            self.limit,
            self.country
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: CatalogSearchResponse = serde_json::from_str(&body)?;

        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_response() {
        let body = r#"{
            "resultCount": 1,
            "results": [{
                "trackId": 1,
                "kind": "podcast",
                "artistName": "A",
                "collectionName": "B",
                "collectionViewUrl": "http://x",
                "artworkUrl600": "http://img"
            }]
        }"#;

        let parsed: CatalogSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].track_id, Some(1));
        assert_eq!(parsed.results[0].kind.as_deref(), Some("podcast"));
        assert_eq!(parsed.results[0].artwork_url_600.as_deref(), Some("http://img"));
    }

    #[test]
    fn test_missing_results_field_is_an_error() {
        let body = r#"{"resultCount": 0}"#;
        assert!(serde_json::from_str::<CatalogSearchResponse>(body).is_err());
    }
}
