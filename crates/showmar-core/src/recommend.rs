use crate::favorites::FavoriteSet;
use showmar_models::CatalogRecord;
use std::collections::HashSet;

pub const MAX_RECOMMENDATIONS: usize = 10;

/// Catalog records sharing a genre with any favorite, excluding favorites
/// themselves. Keeps catalog order.
pub fn recommend(catalog: &[CatalogRecord], favorites: &FavoriteSet) -> Vec<CatalogRecord> {
    let interests: HashSet<u32> = favorites
        .records()
        .iter()
        .flat_map(|r| r.genre_ids.iter().copied())
        .collect();
    if interests.is_empty() {
        return Vec::new();
    }

    catalog
        .iter()
        .filter(|r| !favorites.contains(&r.id))
        .filter(|r| r.genre_ids.iter().any(|g| interests.contains(g)))
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}
