//! Rendering of a settled snapshot for the command line.

use std::fmt::Write as _;

use serde::Serialize;

use crate::session::CartNotice;
use crate::state::{PaginationMode, Product, Snapshot, SortKey};

/// JSON shape of the printed window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView<'a> {
    /// Post-filter match count.
    pub total: usize,
    /// Windowing mode, serialized as `paged` or `infinite`.
    pub mode: PaginationMode,
    /// Active sort key.
    pub sort: &'static str,
    /// Current page or increments loaded.
    pub current_page: usize,
    /// Pages available.
    pub total_pages: usize,
    /// 1-based first visible index.
    pub start_index: usize,
    /// 1-based last visible index.
    pub end_index: usize,
    /// More matches beyond the window.
    pub has_more: bool,
    /// Earlier pages exist.
    pub has_prev: bool,
    /// Load error, if the last transition failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    /// Visible products.
    pub items: Vec<ItemView<'a>>,
    /// Cart additions made during this run.
    pub added_to_cart: Vec<CartLine<'a>>,
}

/// One visible product plus its favorite flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView<'a> {
    /// Catalog record.
    #[serde(flatten)]
    pub product: &'a Product,
    /// Whether the product is a favorite.
    pub favorite: bool,
}

/// Cart addition as printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine<'a> {
    /// Product id.
    pub product_id: &'a str,
    /// Product name.
    pub name: &'a str,
    /// Quantity after the addition.
    pub quantity: u32,
}

/// What: Build the printable view of `snap`.
///
/// Inputs:
/// - `snap`: Settled snapshot
/// - `sort`: Sort key in effect
/// - `is_favorite`: Favorite flag per visible product, in window order
/// - `notices`: Cart notices received during the run
#[must_use]
pub fn results_view<'a>(
    snap: &'a Snapshot,
    sort: SortKey,
    is_favorite: &[bool],
    notices: &'a [CartNotice],
) -> ResultsView<'a> {
    let page = &snap.results.page;
    let error = match &snap.phase {
        crate::state::LoadPhase::Error(msg) => Some(msg.as_str()),
        _ => None,
    };
    ResultsView {
        total: snap.results.total,
        mode: page.mode,
        sort: sort.as_config_key(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        start_index: page.start_index,
        end_index: page.end_index,
        has_more: page.has_more,
        has_prev: page.has_prev,
        error,
        items: snap
            .results
            .items
            .iter()
            .enumerate()
            .map(|(i, p)| ItemView {
                product: p.as_ref(),
                favorite: is_favorite.get(i).copied().unwrap_or(false),
            })
            .collect(),
        added_to_cart: notices
            .iter()
            .map(|n| CartLine {
                product_id: &n.product_id,
                name: &n.name,
                quantity: n.quantity,
            })
            .collect(),
    }
}

/// What: Plain-text rendering of a results view.
///
/// Output:
/// - Header line, one line per product, then cart notices.
#[must_use]
pub fn render_plain(view: &ResultsView<'_>) -> String {
    let mut out = String::new();
    if view.total == 0 {
        out.push_str("No products match the current filters.\n");
    } else {
        let position = if view.mode == PaginationMode::Infinite {
            format!("loaded {}", view.end_index)
        } else {
            format!("page {}/{}", view.current_page, view.total_pages)
        };
        let _ = writeln!(
            out,
            "Showing {}-{} of {} ({position}, sort: {})",
            view.start_index, view.end_index, view.total, view.sort
        );
    }
    for item in &view.items {
        let p = item.product;
        let star = if item.favorite { '*' } else { ' ' };
        let badge = if p.is_new { " [new]" } else { "" };
        let _ = writeln!(
            out,
            "{star} {:<4} {:<28} {:<14} {:>9.2}  {:.1} ({}){badge}",
            p.id, p.name, p.brand, p.price, p.rating, p.review_count
        );
    }
    if view.has_more {
        out.push_str("More results available.\n");
    }
    if let Some(err) = view.error {
        let _ = writeln!(out, "Load failed: {err}");
    }
    for line in &view.added_to_cart {
        let _ = writeln!(
            out,
            "Added to cart: {} (quantity {})",
            line.name, line.quantity
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::builtin;
    use crate::logic::compute;
    use crate::state::{FilterSpec, Window};
    use std::sync::Arc;

    #[test]
    /// What: Plain and JSON rendering of a page
    ///
    /// - Input: Newest-first page 1 of size 3 over the bundled catalog, one cart notice
    /// - Output: Header with range and page; JSON carries camelCase metadata
    fn renders_page_and_notice() {
        let catalog = builtin().expect("bundled catalog");
        let results = compute(
            &catalog,
            &FilterSpec::default(),
            SortKey::NewestFirst,
            Window::Page { page: 1, size: 3 },
        );
        let snap = Snapshot {
            revision: 1,
            results: Arc::new(results),
            ..Snapshot::default()
        };
        let notices = vec![CartNotice {
            product_id: "p1".into(),
            name: "Smartphone X".into(),
            quantity: 1,
        }];
        let view = results_view(&snap, SortKey::NewestFirst, &[true], &notices);
        let text = render_plain(&view);
        assert!(text.starts_with("Showing 1-3 of 20 (page 1/7, sort: newest-first)"));
        assert!(text.contains("Added to cart: Smartphone X (quantity 1)"));
        assert!(text.contains("More results available."));

        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["mode"], "paged");
        assert_eq!(json["totalPages"], 7);
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["items"][0]["favorite"], true);
        assert_eq!(json["items"][1]["favorite"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    /// What: Infinite-mode header reports how many items are loaded
    ///
    /// - Input: Accumulated window of 12 over the bundled catalog
    /// - Output: "loaded 12" header; JSON mode "infinite"
    fn renders_infinite_header() {
        let catalog = builtin().expect("bundled catalog");
        let results = compute(
            &catalog,
            &FilterSpec::default(),
            SortKey::NewestFirst,
            Window::Accumulated { count: 12, size: 6 },
        );
        let snap = Snapshot {
            revision: 1,
            results: Arc::new(results),
            ..Snapshot::default()
        };
        let view = results_view(&snap, SortKey::NewestFirst, &[], &[]);
        assert_eq!(view.mode, PaginationMode::Infinite);
        assert!(
            render_plain(&view).starts_with("Showing 1-12 of 20 (loaded 12, sort: newest-first)")
        );
        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["mode"], "infinite");
    }
}
