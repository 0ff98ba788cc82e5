use std::cmp::Ordering;
use std::sync::Arc;

use crate::state::{Product, SortKey};

/// What: Sort `items` in place by `key`.
///
/// Inputs:
/// - `items`: Filtered products
/// - `key`: Active sort key
///
/// Output:
/// - `items` reordered; equal elements keep their prior relative order.
///
/// Details:
/// - Uses a stable sort, so price ties stay in catalog order and re-sorting an
///   already sorted list by the same key is a no-op.
/// - Rating ties fall back to review count, highest first.
pub fn sort_products(items: &mut [Arc<Product>], key: SortKey) {
    match key {
        SortKey::NewestFirst => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceLowHigh => items.sort_by(|a, b| compare_values(a.price, b.price)),
        SortKey::PriceHighLow => items.sort_by(|a, b| compare_values(b.price, a.price)),
        SortKey::NameAsc => items.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => items.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::RatingHighLow => items.sort_by(|a, b| {
            compare_values(b.rating, a.rating)
                .then_with(|| b.review_count.cmp(&a.review_count))
        }),
    }
}

/// Numeric comparison where `-0.0` and `0.0` tie; catalog validation rejects NaN.
fn compare_values(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// What: Collation-style name comparison.
///
/// Inputs:
/// - `a`, `b`: Display names
///
/// Output:
/// - Ordering that ignores case and common Latin accents first, then breaks
///   ties with lowercase before uppercase.
///
/// Details:
/// - Approximates a root-locale collation: "apple" < "Banana" < "éclair" < "Zebra".
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .cmp(b.chars().flat_map(char::to_lowercase).map(fold_accent));
    primary
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Strip the accent from common Latin-1 lowercase letters.
const fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}
