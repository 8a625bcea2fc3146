use crate::clients::catalog::CatalogItem;

/// A normalized catalog item, ready to be upserted.
///
/// Field fallbacks mirror what the upstream catalog actually returns: albums
/// carry `collectionName`/`collectionViewUrl`, single tracks only carry the
/// `track*` variants, and artwork comes in two resolutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub id: i64,
    pub kind: String,
    pub artist_name: String,
    pub collection_name: String,
    pub collection_view_url: String,
    pub image: String,
    pub search_date: String,
}

impl SearchRecord {
    /// Normalize one raw catalog item.
    ///
    /// The id falls back from `trackId` to `collectionId` to a synthetic id
    /// derived from the item's display fields. The synthetic id is a stable
    /// hash rather than a timestamp so that retrying the same search cannot
    /// create duplicate rows for an id-less item.
    #[must_use]
    pub fn from_catalog_item(item: &CatalogItem, search_date: String) -> Self {
        let kind = item.kind.clone().unwrap_or_default();
        let artist_name = item.artist_name.clone().unwrap_or_default();

        let collection_name = item
            .collection_name
            .clone()
            .or_else(|| item.track_name.clone())
            .unwrap_or_default();

        let collection_view_url = item
            .collection_view_url
            .clone()
            .or_else(|| item.track_view_url.clone())
            .unwrap_or_default();

        let image = item
            .artwork_url_600
            .clone()
            .or_else(|| item.artwork_url_100.clone())
            .unwrap_or_default();

        let id = item.track_id.or(item.collection_id).unwrap_or_else(|| {
            synthetic_id(&kind, &artist_name, &collection_name, &collection_view_url)
        });

        Self {
            id,
            kind,
            artist_name,
            collection_name,
            collection_view_url,
            image,
            search_date,
        }
    }
}

/// Deterministic fallback id for items missing both natural ids.
/// Low 63 bits of a blake3 digest, keeping the id positive.
fn synthetic_id(kind: &str, artist: &str, collection: &str, url: &str) -> i64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(kind.as_bytes());
    hasher.update(b"\0");
    hasher.update(artist.as_bytes());
    hasher.update(b"\0");
    hasher.update(collection.as_bytes());
    hasher.update(b"\0");
    hasher.update(url.as_bytes());

    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest.as_bytes()[..8].try_into().unwrap_or_default();
    i64::from_le_bytes(bytes) & i64::MAX
}
