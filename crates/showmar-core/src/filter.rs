//! Derived browse lists: filter then sort a catalog page.

use showmar_models::{CatalogRecord, FilterSpec, SortKey};
use std::cmp::Ordering;

/// Apply every active predicate of `spec`, then its sort.
///
/// Pure and deterministic. Predicates compose by AND; `SortKey::None`
/// keeps input order, and both sorts are stable.
pub fn apply(records: &[CatalogRecord], spec: &FilterSpec) -> Vec<CatalogRecord> {
    let needle = spec.title.to_lowercase();
    let mut view: Vec<CatalogRecord> = records
        .iter()
        .filter(|record| matches_with_needle(record, spec, &needle))
        .cloned()
        .collect();

    match spec.sort {
        SortKey::None => {}
        SortKey::PopularityDesc => {
            view.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        }
        SortKey::ReleaseDateDesc => {
            view.sort_by(|a, b| newest_first(a, b));
        }
    }

    view
}

pub fn matches(record: &CatalogRecord, spec: &FilterSpec) -> bool {
    matches_with_needle(record, spec, &spec.title.to_lowercase())
}

fn matches_with_needle(record: &CatalogRecord, spec: &FilterSpec, needle: &str) -> bool {
    if !needle.is_empty() && !record.title.to_lowercase().contains(needle) {
        return false;
    }

    if let Some(genre_id) = spec.genre_id {
        if !record.has_genre(genre_id) {
            return false;
        }
    }

    if let Some(year) = spec.year.as_deref().filter(|y| !y.is_empty()) {
        match record.release_date.as_deref() {
            Some(date) if date.starts_with(year) => {}
            _ => return false,
        }
    }

    if let Some(min_rating) = spec.min_rating {
        // Unrated records fail any active rating filter
        match record.vote_average {
            Some(rating) if rating >= min_rating => {}
            _ => return false,
        }
    }

    true
}

fn newest_first(a: &CatalogRecord, b: &CatalogRecord) -> Ordering {
    match (a.released_on(), b.released_on()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
