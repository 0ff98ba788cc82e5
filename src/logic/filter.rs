use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry};
use crate::state::{Category, FilterSpec, Product};

/// What: Apply the search, category and price predicates to the catalog.
///
/// Inputs:
/// - `catalog`: Source records
/// - `filters`: Active filter selection
///
/// Output:
/// - Matching products in catalog order (shared, not copied).
///
/// Details:
/// - Predicates run in a fixed order: search text, categories, price range.
/// - Empty search text and an empty category set impose no restriction.
/// - Search is a case-insensitive substring test against name, brand, category
///   label, description and every tag.
pub fn apply_filters(catalog: &Catalog, filters: &FilterSpec) -> Vec<Arc<Product>> {
    let needle = filters.search.trim().to_lowercase();
    let mut out = Vec::with_capacity(catalog.len());
    for entry in catalog.entries() {
        if !needle.is_empty() && !matches_search(entry, &needle) {
            continue;
        }
        if !matches_category(&entry.product, &filters.categories) {
            continue;
        }
        if !filters.price.contains(entry.product.price) {
            continue;
        }
        out.push(Arc::clone(&entry.product));
    }
    out
}

/// What: Substring test of a lower-cased needle against an entry's fields.
///
/// Inputs:
/// - `entry`: Catalog entry with precomputed haystack
/// - `needle_lower`: Already lower-cased, non-empty search text
///
/// Output:
/// - `true` when at least one field contains the needle.
pub(crate) fn matches_search(entry: &CatalogEntry, needle_lower: &str) -> bool {
    entry.haystack.iter().any(|field| field.contains(needle_lower))
}

/// What: Category membership test; an empty selection admits everything.
///
/// Inputs:
/// - `p`: Product under test
/// - `selected`: Selected categories
///
/// Output:
/// - `true` when `selected` is empty or contains `p.category`.
#[must_use]
pub fn matches_category(p: &Product, selected: &BTreeSet<Category>) -> bool {
    selected.is_empty() || selected.contains(&p.category)
}
