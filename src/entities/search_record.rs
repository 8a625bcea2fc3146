use sea_orm::entity::prelude::*;

/// One observation of a catalog entity, keyed by the catalog's natural id.
/// Every upsert replaces all mutable columns, including `search_date`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "search_records")]
pub struct Model {
    /// Natural external identifier (trackId/collectionId, or a synthetic
    /// fallback). Not auto-incremented.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub kind: String,
    pub artist_name: String,
    pub collection_name: String,
    pub collection_view_url: String,
    pub image: String,
    pub search_date: String, // SQLite doesn't strictly enforce types, but typically strings for ISO8601
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
