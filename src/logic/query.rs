use std::sync::Arc;

use crate::catalog::Catalog;
use crate::state::{DerivedResultSet, FilterSpec, Product, SortKey, Window};

use super::{filter::apply_filters, sort::sort_products, window::apply_window};

/// What: Filter and sort the catalog without windowing.
///
/// Inputs:
/// - `catalog`: Source records
/// - `filters`: Active filter selection
/// - `sort`: Active sort key
///
/// Output:
/// - Every matching product in sorted order.
///
/// Details:
/// - This stage is independent of the pagination mode; the session keeps its
///   output and re-windows it when only the page changes.
#[must_use]
pub fn select(catalog: &Catalog, filters: &FilterSpec, sort: SortKey) -> Vec<Arc<Product>> {
    let mut matches = apply_filters(catalog, filters);
    sort_products(&mut matches, sort);
    tracing::trace!(
        query = %filters.search,
        categories = filters.categories.len(),
        sort = sort.as_config_key(),
        matches = matches.len(),
        "[Query] Selected matches"
    );
    matches
}

/// What: Run the full query engine: filter, sort, then window.
///
/// Inputs:
/// - `catalog`: Source records
/// - `filters`: Active filter selection
/// - `sort`: Active sort key
/// - `window`: Page or accumulated window (`page >= 1`, `size >= 1`)
///
/// Output:
/// - Deterministic `DerivedResultSet` for the given inputs.
///
/// Details:
/// - Pure: reads its inputs and owns no state.
/// - An empty catalog yields an empty result with `total == 0` and no more pages.
#[must_use]
pub fn compute(
    catalog: &Catalog,
    filters: &FilterSpec,
    sort: SortKey,
    window: Window,
) -> DerivedResultSet {
    apply_window(&select(catalog, filters, sort), window)
}
