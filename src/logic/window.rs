use std::sync::Arc;

use crate::state::{DerivedResultSet, PageInfo, PaginationMode, Product, Window};

/// What: Slice the filtered, sorted list to the requested window.
///
/// Inputs:
/// - `matches`: Filtered and sorted products
/// - `window`: Page or accumulated window (`page >= 1`, `size >= 1`)
///
/// Output:
/// - `DerivedResultSet` holding the visible slice plus pagination metadata.
///
/// Details:
/// - `total` is the length of `matches`, independent of the window.
/// - `has_more` is true iff the window's upper bound is below `total`.
/// - Windows past the end yield an empty slice rather than panicking.
#[must_use]
pub fn apply_window(matches: &[Arc<Product>], window: Window) -> DerivedResultSet {
    let total = matches.len();
    let (start, end) = bounds(total, window);
    DerivedResultSet {
        items: matches[start..end].to_vec(),
        total,
        page: page_info(total, window, start, end),
    }
}

/// Clamp the window to `[0, total]` as a half-open range.
fn bounds(total: usize, window: Window) -> (usize, usize) {
    match window {
        Window::Page { page, size } => {
            let start = page.saturating_sub(1).saturating_mul(size).min(total);
            (start, window.upper_bound().min(total))
        }
        Window::Accumulated { count, .. } => (0, count.min(total)),
    }
}

/// What: Derive pagination metadata for a window over `total` matches.
///
/// Inputs:
/// - `total`: Post-filter match count
/// - `window`: Requested window
/// - `start`, `end`: Clamped half-open bounds of the visible slice
///
/// Output:
/// - `PageInfo` with 1-based start/end indices (zero for an empty slice).
fn page_info(total: usize, window: Window, start: usize, end: usize) -> PageInfo {
    let size = window.size().max(1);
    let total_pages = total.div_ceil(size);
    let (mode, current_page, has_prev) = match window {
        Window::Page { page, .. } => (PaginationMode::Paged, page, page > 1),
        Window::Accumulated { count, .. } => {
            (PaginationMode::Infinite, count.div_ceil(size).max(1), false)
        }
    };
    let visible = end > start;
    PageInfo {
        mode,
        current_page,
        total_pages,
        page_size: size,
        start_index: if visible { start + 1 } else { 0 },
        end_index: if visible { end } else { 0 },
        has_more: window.upper_bound() < total,
        has_prev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::state::Category;

    fn list(n: usize) -> Vec<Arc<Product>> {
        (1..=n)
            .map(|i| Arc::new(product(&format!("p{i}"), "x", Category::Books, 1.0)))
            .collect()
    }

    #[test]
    /// What: Last partial page
    ///
    /// - Input: 6 matches, page 2 of size 4
    /// - Output: Items 5-6, has_more false, has_prev true
    fn last_partial_page() {
        let r = apply_window(&list(6), Window::Page { page: 2, size: 4 });
        assert_eq!(r.ids(), vec!["p5", "p6"]);
        assert_eq!(r.total, 6);
        assert!(!r.page.has_more);
        assert!(r.page.has_prev);
        assert_eq!(r.page.total_pages, 2);
        assert_eq!((r.page.start_index, r.page.end_index), (5, 6));
    }

    #[test]
    /// What: has_more follows page * size < total
    ///
    /// - Input: 8 matches, pages 1 and 2 of size 4
    /// - Output: true on page 1, false on exactly-full page 2
    fn has_more_matches_upper_bound() {
        let items = list(8);
        assert!(apply_window(&items, Window::Page { page: 1, size: 4 }).page.has_more);
        assert!(!apply_window(&items, Window::Page { page: 2, size: 4 }).page.has_more);
    }

    #[test]
    /// What: Accumulated windows return a prefix
    ///
    /// - Input: 10 matches, count 8 of increment 4; then count 12
    /// - Output: First 8 with more pending; then all 10 with none
    fn accumulated_prefix() {
        let items = list(10);
        let r = apply_window(&items, Window::Accumulated { count: 8, size: 4 });
        assert_eq!(r.items.len(), 8);
        assert_eq!(r.ids()[0], "p1");
        assert!(r.page.has_more);
        assert_eq!(r.page.current_page, 2);
        assert_eq!(r.page.mode, PaginationMode::Infinite);
        let r = apply_window(&items, Window::Accumulated { count: 12, size: 4 });
        assert_eq!(r.items.len(), 10);
        assert!(!r.page.has_more);
        assert_eq!(r.page.end_index, 10);
    }

    #[test]
    /// What: Empty input and out-of-range pages do not panic
    ///
    /// - Input: No matches; page 5 over 3 matches
    /// - Output: Empty slices, zero indices, no more
    fn empty_and_past_end() {
        let r = apply_window(&[], Window::Page { page: 1, size: 4 });
        assert!(r.is_empty());
        assert_eq!(r.total, 0);
        assert_eq!(r.page.total_pages, 0);
        assert_eq!(r.page.start_index, 0);
        assert!(!r.page.has_more);
        let r = apply_window(&list(3), Window::Page { page: 5, size: 4 });
        assert!(r.is_empty());
        assert_eq!(r.total, 3);
    }
}
