//! Catalog source: the immutable, validated product list the session queries.
//!
//! The catalog is built once (from JSON on disk or the bundled mock data) and
//! shared behind an `Arc` for the lifetime of the process. Each record carries
//! a lower-cased search haystack computed at construction so the search filter
//! does not re-lowercase every field on every keystroke.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StoreError;
use crate::state::Product;

/// Bundled demo catalog and its loader.
pub mod mock;
/// JSON loading from disk.
pub mod persist;

/// What: Pair a product with its precomputed, lower-cased searchable fields.
///
/// Details:
/// - `haystack` holds name, brand, category label, description and each tag as
///   separate strings so a match never spans two fields.
#[derive(Debug)]
pub(crate) struct CatalogEntry {
    /// Shared record handed out in derived result sets.
    pub(crate) product: Arc<Product>,
    /// Lower-cased searchable fields.
    pub(crate) haystack: Box<[String]>,
}

impl CatalogEntry {
    /// Build the entry and its haystack for `product`.
    fn new(product: Product) -> Self {
        let mut fields = Vec::with_capacity(4 + product.tags.len());
        fields.push(product.name.to_lowercase());
        fields.push(product.brand.to_lowercase());
        fields.push(product.category.label().to_lowercase());
        fields.push(product.description.to_lowercase());
        fields.extend(product.tags.iter().map(|t| t.to_lowercase()));
        Self {
            product: Arc::new(product),
            haystack: fields.into_boxed_slice(),
        }
    }
}

/// Immutable, ordered product collection with O(1) lookup by id.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Records in source order.
    entries: Vec<CatalogEntry>,
    /// Maps product id to its position in `entries`.
    id_to_idx: HashMap<String, usize>,
}

impl Catalog {
    /// What: Validate `products` and build the catalog.
    ///
    /// Inputs:
    /// - `products`: Records in source order
    ///
    /// Output:
    /// - `Ok(Catalog)` when every record satisfies the data-model invariants.
    ///
    /// # Errors
    /// - `StoreError::DuplicateProductId` when two records share an id.
    /// - `StoreError::InvalidProduct` for an empty id, a negative or non-finite
    ///   price, or a rating outside `[0, 5]`.
    ///
    /// Details:
    /// - An empty list is valid and produces an empty catalog.
    pub fn new(products: Vec<Product>) -> Result<Self, StoreError> {
        let mut entries = Vec::with_capacity(products.len());
        let mut id_to_idx = HashMap::with_capacity(products.len());
        for product in products {
            validate(&product)?;
            if id_to_idx.insert(product.id.clone(), entries.len()).is_some() {
                return Err(StoreError::DuplicateProductId(product.id));
            }
            entries.push(CatalogEntry::new(product));
        }
        tracing::debug!(products = entries.len(), "[Catalog] Catalog built");
        Ok(Self { entries, id_to_idx })
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Product>> {
        self.id_to_idx.get(id).map(|&i| &self.entries[i].product)
    }

    /// Iterate products in source order.
    pub fn products(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.entries.iter().map(|e| &e.product)
    }

    /// Entries with their search haystacks, for the query engine.
    pub(crate) fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// What: Check a single record against the data-model invariants.
///
/// Inputs:
/// - `p`: Record to check
///
/// Output:
/// - `Ok(())` or `StoreError::InvalidProduct` naming the failed invariant.
fn validate(p: &Product) -> Result<(), StoreError> {
    let fail = |reason: &str| StoreError::InvalidProduct {
        id: p.id.clone(),
        reason: reason.to_string(),
    };
    if p.id.trim().is_empty() {
        return Err(fail("empty id"));
    }
    if !p.price.is_finite() || p.price < 0.0 {
        return Err(fail("price must be a finite value >= 0"));
    }
    if !(0.0..=5.0).contains(&p.rating) {
        return Err(fail("rating must lie within [0, 5]"));
    }
    Ok(())
}
