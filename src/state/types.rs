//! Core value types used by the storefront state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Product category. The set is closed: catalog records outside it are rejected
/// at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// Phones, tablets, audio and accessories.
    Electronics,
    /// Apparel and shoes.
    Clothing,
    /// Furniture, kitchen and garden supplies.
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    /// Printed and digital books.
    Books,
    /// Sporting goods.
    Sports,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 5] = [
        Self::Electronics,
        Self::Clothing,
        Self::HomeAndGarden,
        Self::Books,
        Self::Sports,
    ];

    /// Display label; also the text the search filter matches against.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::HomeAndGarden => "Home & Garden",
            Self::Books => "Books",
            Self::Sports => "Sports",
        }
    }

    /// What: Parse a category from its label or a slug alias.
    ///
    /// Inputs:
    /// - `s`: Text such as `"Books"`, `"home & garden"`, `"home-garden"` (case-insensitive)
    ///
    /// Output:
    /// - `Some(Category)` on a recognized value; `None` otherwise.
    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        match key.as_str() {
            "electronics" => Some(Self::Electronics),
            "clothing" | "apparel" => Some(Self::Clothing),
            "homegarden" | "homeandgarden" | "home" => Some(Self::HomeAndGarden),
            "books" | "book" => Some(Self::Books),
            "sports" | "sport" => Some(Self::Sports),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| StoreError::UnknownCategory(s.to_string()))
    }
}

/// Category chip selection: either "All" or exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryChoice {
    /// No category restriction.
    All,
    /// Restrict to a single category.
    Only(Category),
}

impl FromStr for CategoryChoice {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Immutable catalog record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Brand or manufacturer.
    pub brand: String,
    /// One of the fixed categories.
    pub category: Category,
    /// Current price; never negative.
    pub price: f64,
    /// Price before discount, when discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Discount percentage, when discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    /// Average rating in `[0, 5]`.
    pub rating: f64,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub review_count: u32,
    /// Listing timestamp; drives newest-first ordering.
    pub created_at: DateTime<Utc>,
    /// Whether the card shows a "new" badge.
    #[serde(default)]
    pub is_new: bool,
    /// Free-text tags, searched alongside the name.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Image location for the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Ordering applied to the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Default: most recently created first.
    #[default]
    NewestFirst,
    /// Cheapest first.
    PriceLowHigh,
    /// Most expensive first.
    PriceHighLow,
    /// Name A to Z.
    NameAsc,
    /// Name Z to A.
    NameDesc,
    /// Best rated first; more reviews win ties.
    RatingHighLow,
}

impl SortKey {
    /// Every sort key in the order the sort sheet lists them.
    pub const ALL: [Self; 6] = [
        Self::NewestFirst,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::NameAsc,
        Self::NameDesc,
        Self::RatingHighLow,
    ];

    /// Return the string key used in settings files and on the command line.
    ///
    /// Inputs: none
    ///
    /// Output: Static config key string.
    #[must_use]
    pub const fn as_config_key(&self) -> &'static str {
        match self {
            Self::NewestFirst => "newest-first",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
            Self::NameAsc => "name-a-z",
            Self::NameDesc => "name-z-a",
            Self::RatingHighLow => "rating-high-low",
        }
    }

    /// Human readable label for sort menus.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NewestFirst => "Newest First",
            Self::PriceLowHigh => "Price: Low to High",
            Self::PriceHighLow => "Price: High to Low",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
            Self::RatingHighLow => "Highest Rated",
        }
    }

    /// Parse a sort key from its config key or common aliases.
    ///
    /// Inputs: `s` config string (case-insensitive, `_` and `-` interchangeable).
    ///
    /// Output: `Some(SortKey)` on recognized value; `None` otherwise.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "newest-first" | "newest" | "new" => Some(Self::NewestFirst),
            "price-low-high" | "price-asc" | "cheapest" => Some(Self::PriceLowHigh),
            "price-high-low" | "price-desc" => Some(Self::PriceHighLow),
            "name-a-z" | "name-asc" | "name" => Some(Self::NameAsc),
            "name-z-a" | "name-desc" => Some(Self::NameDesc),
            "rating-high-low" | "rating" | "top-rated" => Some(Self::RatingHighLow),
            _ => None,
        }
    }
}

impl FromStr for SortKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config_key(s).ok_or_else(|| StoreError::UnknownSortKey(s.to_string()))
    }
}

/// Inclusive price bounds. Construction enforces `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl PriceRange {
    /// What: Build a validated price range.
    ///
    /// Inputs:
    /// - `min`, `max`: Inclusive bounds; `max` may be `f64::INFINITY`
    ///
    /// Output:
    /// - `Ok(PriceRange)` when `min <= max` and neither bound is NaN.
    ///
    /// # Errors
    /// - `StoreError::InvalidRange` when the bounds are inverted or NaN.
    pub fn new(min: f64, max: f64) -> Result<Self, StoreError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(StoreError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Whether `price` lies within the inclusive bounds.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Session-scoped filter selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    /// Selected categories; empty means no category restriction.
    pub categories: BTreeSet<Category>,
    /// Trimmed search text; empty means no text restriction.
    pub search: String,
    /// Inclusive price bounds.
    pub price: PriceRange,
}

impl FilterSpec {
    /// Whether any predicate would exclude products.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.categories.is_empty()
            || !self.search.is_empty()
            || self.price != PriceRange::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: SortKey config key mapping roundtrip and alias handling
    ///
    /// - Input: Every key's config string plus aliases and an unknown key
    /// - Output: Correct mapping to enum variants; None for unknown
    fn sort_key_config_roundtrip_and_aliases() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_config_key(key.as_config_key()), Some(key));
        }
        assert_eq!(SortKey::from_config_key("PRICE_LOW_HIGH"), Some(SortKey::PriceLowHigh));
        assert_eq!(SortKey::from_config_key("rating"), Some(SortKey::RatingHighLow));
        assert_eq!(SortKey::from_config_key("popularity"), None);
        assert!("bogus".parse::<SortKey>().is_err());
    }

    #[test]
    /// What: Category labels and slugs parse back to the same variant
    ///
    /// - Input: Labels, mixed case, slug forms
    /// - Output: Matching categories; "All" handled by `CategoryChoice`
    fn category_parsing_accepts_labels_and_slugs() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
        }
        assert_eq!(Category::from_label("home-garden"), Some(Category::HomeAndGarden));
        assert_eq!(Category::from_label(" BOOKS "), Some(Category::Books));
        assert_eq!(Category::from_label("toys"), None);
        assert_eq!("All".parse::<CategoryChoice>().ok(), Some(CategoryChoice::All));
        assert_eq!(
            "sports".parse::<CategoryChoice>().ok(),
            Some(CategoryChoice::Only(Category::Sports))
        );
    }

    #[test]
    /// What: Price ranges reject inverted and NaN bounds
    ///
    /// - Input: Valid, inverted and NaN bounds
    /// - Output: Ok only for the valid range; inclusive containment
    fn price_range_validation() {
        let r = PriceRange::new(10.0, 20.0).expect("valid range");
        assert!(r.contains(10.0));
        assert!(r.contains(20.0));
        assert!(!r.contains(20.01));
        assert!(PriceRange::new(5.0, 1.0).is_err());
        assert!(PriceRange::new(f64::NAN, 1.0).is_err());
        assert!(PriceRange::default().contains(1_000_000.0));
    }

    #[test]
    /// What: FilterSpec activity tracks each predicate
    ///
    /// - Input: Default filters, then one field changed at a time
    /// - Output: Only the default selection is inactive
    fn filter_spec_is_active() {
        let mut f = FilterSpec::default();
        assert!(!f.is_active());
        f.search = "phone".into();
        assert!(f.is_active());
        f = FilterSpec::default();
        f.categories.insert(Category::Books);
        assert!(f.is_active());
        f = FilterSpec::default();
        f.price = PriceRange::new(0.0, 50.0).expect("valid range");
        assert!(f.is_active());
    }

    #[test]
    /// What: Products deserialize from the camelCase catalog format
    ///
    /// - Input: JSON record with optional fields omitted
    /// - Output: Defaults applied; category label mapped
    fn product_deserializes_camel_case() {
        let json = r#"{
            "id": "p9", "name": "Lamp", "brand": "Glow", "category": "Home & Garden",
            "price": 25.5, "rating": 4.1, "reviewCount": 12,
            "createdAt": "2024-03-01T08:00:00Z", "isNew": true
        }"#;
        let p: Product = serde_json::from_str(json).expect("valid product json");
        assert_eq!(p.category, Category::HomeAndGarden);
        assert_eq!(p.review_count, 12);
        assert!(p.is_new);
        assert!(p.tags.is_empty());
        assert!(p.original_price.is_none());
    }
}
