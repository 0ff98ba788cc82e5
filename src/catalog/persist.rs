use std::fs;
use std::path::Path;

use super::Catalog;
use crate::error::StoreError;
use crate::state::Product;

/// What: Parse a catalog from a JSON array of product records.
///
/// Inputs:
/// - `s`: JSON text in the camelCase record format
///
/// Output:
/// - Validated `Catalog`.
///
/// # Errors
/// - `StoreError::Json` on malformed JSON or unknown categories.
/// - Validation errors from [`Catalog::new`].
pub fn from_json_str(s: &str) -> Result<Catalog, StoreError> {
    let products: Vec<Product> = serde_json::from_str(s)?;
    Catalog::new(products)
}

/// What: Load a catalog from a JSON file.
///
/// Inputs:
/// - `path`: File holding a JSON array of product records
///
/// Output:
/// - Validated `Catalog`.
///
/// # Errors
/// - `StoreError::Io` when the file cannot be read.
/// - Parse and validation errors from [`from_json_str`].
pub fn load_from_disk(path: &Path) -> Result<Catalog, StoreError> {
    let s = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let catalog = from_json_str(&s)?;
    tracing::info!(
        path = %path.display(),
        products = catalog.len(),
        "[Catalog] Loaded catalog from disk"
    );
    Ok(catalog)
}
