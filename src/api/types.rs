use serde::Serialize;

use crate::entities::search_record;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Wire shape of a stored record. The search endpoint returns a bare array
/// of these, with no envelope.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordDto {
    pub id: i64,
    pub kind: String,
    pub artist_name: String,
    pub collection_name: String,
    pub collection_view_url: String,
    pub image: String,
    pub search_date: String,
}

impl From<search_record::Model> for SearchRecordDto {
    fn from(model: search_record::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            artist_name: model.artist_name,
            collection_name: model.collection_name,
            collection_view_url: model.collection_view_url,
            image: model.image,
            search_date: model.search_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub stored_records: u64,
    pub db_ready: bool,
}
