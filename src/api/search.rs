use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, AppState, SearchRecordDto};

/// `GET /search/{search_word}`
///
/// Returns the freshly upserted records as a bare JSON array, in catalog
/// order. By default an upstream failure is reported as an empty array with
/// status 200 to stay drop-in compatible with callers that cannot tell "no
/// matches" from "catalog down"; `catalog.strict_errors` switches that case
/// to a 502 error body.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(search_word): Path<String>,
) -> Result<Json<Vec<SearchRecordDto>>, ApiError> {
    let term = search_word.trim();
    if term.is_empty() {
        return Err(ApiError::validation("searchWord parameter is required"));
    }

    match state.search_service.search_and_save(term).await {
        Ok(records) => Ok(Json(records.into_iter().map(Into::into).collect())),
        Err(e) => {
            metrics::counter!("catalog_request_failures_total").increment(1);

            if state.config.catalog.strict_errors {
                Err(ApiError::catalog_error(e.to_string()))
            } else {
                warn!(
                    "Catalog search for '{}' failed, returning empty result set: {}",
                    term, e
                );
                Ok(Json(Vec::new()))
            }
        }
    }
}

/// `GET /search` and `GET /search/` — the path parameter is missing.
pub async fn missing_term() -> ApiError {
    ApiError::validation("searchWord parameter is required")
}
