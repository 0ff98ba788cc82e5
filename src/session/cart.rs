use std::collections::HashMap;

use crate::state::Product;

/// Payload of an "added to cart" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartNotice {
    /// Product that was added.
    pub product_id: String,
    /// Display name for the toast.
    pub name: String,
    /// Quantity of this product now in the cart.
    pub quantity: u32,
}

/// Quantities per product id.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    /// Product id to quantity.
    lines: HashMap<String, u32>,
}

impl Cart {
    /// What: Add one unit of `product`.
    ///
    /// Inputs:
    /// - `product`: Catalog record being added
    ///
    /// Output:
    /// - Notice describing the new quantity.
    pub fn add(&mut self, product: &Product) -> CartNotice {
        let qty = self.lines.entry(product.id.clone()).or_insert(0);
        *qty = qty.saturating_add(1);
        CartNotice {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: *qty,
        }
    }

    /// Quantity of `id` in the cart.
    #[must_use]
    pub fn quantity(&self, id: &str) -> u32 {
        self.lines.get(id).copied().unwrap_or(0)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.values().copied().fold(0, u32::saturating_add)
    }
}
