use anyhow::Result;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::db::StoreError;
use crate::entities::{prelude::SearchRecords, search_record};
use crate::models::record::SearchRecord;

pub struct RecordRepository {
    conn: DatabaseConnection,
}

impl RecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert-or-replace by natural id. All mutable columns, including
    /// `search_date`, take the new values; returns the stored row.
    pub async fn upsert(&self, record: SearchRecord) -> Result<search_record::Model, StoreError> {
        let id = record.id;

        let active_model = search_record::ActiveModel {
            id: Set(record.id),
            kind: Set(record.kind),
            artist_name: Set(record.artist_name),
            collection_name: Set(record.collection_name),
            collection_view_url: Set(record.collection_view_url),
            image: Set(record.image),
            search_date: Set(record.search_date),
        };

        SearchRecords::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(search_record::Column::Id)
                    .update_columns([
                        search_record::Column::Kind,
                        search_record::Column::ArtistName,
                        search_record::Column::CollectionName,
                        search_record::Column::CollectionViewUrl,
                        search_record::Column::Image,
                        search_record::Column::SearchDate,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        let stored = SearchRecords::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| {
                StoreError::Write(DbErr::RecordNotFound(format!(
                    "search record {id} missing after upsert"
                )))
            })?;

        Ok(stored)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = SearchRecords::find().count(&self.conn).await?;
        Ok(count)
    }
}
