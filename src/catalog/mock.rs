use super::Catalog;
use crate::error::StoreError;

/// Demo catalog: 20 products across all five categories.
const MOCK_PRODUCTS: &str = include_str!("mock_products.json");

/// What: Build the bundled demo catalog.
///
/// Inputs: none
///
/// Output:
/// - Catalog of 20 products, 6 of them books.
///
/// # Errors
/// - Only if the bundled JSON were malformed; covered by tests.
pub fn builtin() -> Result<Catalog, StoreError> {
    super::persist::from_json_str(MOCK_PRODUCTS)
}
