//! Store worker behavior: serialized commands, re-entrancy guard, stale loads.

use std::sync::Arc;
use std::time::Duration;

use storefront::app::{LatencyProfile, StoreHandle, spawn_store_worker};
use storefront::catalog::mock;
use storefront::session::{StoreEvent, Storefront};
use storefront::state::{Category, CategoryChoice, LoadPhase, PaginationMode, SortKey};

fn spawn(mode: PaginationMode, size: usize, latency: LatencyProfile) -> StoreHandle {
    let catalog = Arc::new(mock::builtin().expect("bundled catalog"));
    let (handle, _events) = spawn_store_worker(Storefront::new(catalog, mode, size), latency);
    handle
}

fn uniform(ms: u64) -> LatencyProfile {
    let d = Duration::from_millis(ms);
    LatencyProfile {
        page: d,
        early_page: d,
        early_pages: 0,
        load_more: d,
        refresh: d,
    }
}

#[tokio::test]
/// What: Two next-page requests while the first is pending advance exactly once
///
/// - Input: NextPage twice back to back with 30ms latency
/// - Output: Page 2 after settling, not page 3
async fn double_next_page_advances_once() {
    let h = spawn(PaginationMode::Paged, 4, uniform(30));
    h.next_page();
    h.next_page();
    let pending = h.sync().await.expect("worker alive");
    assert_eq!(pending.phase, LoadPhase::LoadingPage { target: 2 });
    assert_eq!(pending.results.page.current_page, 1);
    let settled = h.wait_idle().await.expect("worker alive");
    assert_eq!(settled.results.page.current_page, 2);
    assert_eq!(settled.phase, LoadPhase::Idle);
}

#[tokio::test]
/// What: A filter change makes the pending page load stale
///
/// - Input: GoToPage(3) with 50ms latency, then a category change
/// - Output: Page 1 of the new category, still page 1 after the old load resolved
async fn filter_change_drops_pending_page() {
    let h = spawn(PaginationMode::Paged, 2, uniform(50));
    h.go_to_page(3);
    h.set_category(CategoryChoice::Only(Category::Books));
    let snap = h.wait_idle().await.expect("worker alive");
    assert_eq!(snap.results.total, 6);
    assert_eq!(snap.results.page.current_page, 1);
    tokio::time::sleep(Duration::from_millis(120)).await;
    let later = h.sync().await.expect("worker alive");
    assert_eq!(later.results.page.current_page, 1);
    assert_eq!(later.results.total, 6);
}

#[tokio::test]
/// What: A refresh supersedes a pending page load
///
/// - Input: Sort change, GoToPage(3) with 80ms page latency, then Refresh at 10ms
/// - Output: LoadingInitial replaces LoadingPage; page 1 with the default sort
///   after settling, and still page 1 once the old page load resolved
async fn refresh_cancels_pending_page() {
    let latency = LatencyProfile {
        refresh: Duration::from_millis(10),
        ..uniform(80)
    };
    let h = spawn(PaginationMode::Paged, 4, latency);
    h.set_sort(SortKey::PriceHighLow);
    h.go_to_page(3);
    h.refresh();
    let pending = h.sync().await.expect("worker alive");
    assert_eq!(pending.phase, LoadPhase::LoadingInitial);
    let settled = h.wait_idle().await.expect("worker alive");
    assert_eq!(settled.results.page.current_page, 1);
    assert_eq!(settled.results.items[0].id, "p17");
    tokio::time::sleep(Duration::from_millis(150)).await;
    let later = h.sync().await.expect("worker alive");
    assert_eq!(later.results.page.current_page, 1);
    assert_eq!(later.phase, LoadPhase::Idle);
}

#[tokio::test]
/// What: PrevPage through the handle steps back one page
///
/// - Input: GoToPage(3), settle, PrevPage, settle; PrevPage on page 1
/// - Output: Page 2; then page 1 stays Idle without a load
async fn prev_page_through_worker() {
    let h = spawn(PaginationMode::Paged, 4, uniform(10));
    h.go_to_page(3);
    assert_eq!(
        h.wait_idle().await.expect("worker alive").results.page.current_page,
        3
    );
    h.prev_page();
    assert_eq!(
        h.wait_idle().await.expect("worker alive").results.page.current_page,
        2
    );
    h.prev_page();
    h.wait_idle().await.expect("worker alive");
    h.prev_page();
    let first = h.sync().await.expect("worker alive");
    assert_eq!(first.results.page.current_page, 1);
    assert_eq!(first.phase, LoadPhase::Idle);
}

#[tokio::test]
/// What: Reset through the handle applies immediately
///
/// - Input: Category Books and page 2 at size 4, then Reset
/// - Output: All 20 products on page 1
async fn reset_through_worker() {
    let h = spawn(PaginationMode::Paged, 4, LatencyProfile::ZERO);
    h.set_category(CategoryChoice::Only(Category::Books));
    h.next_page();
    h.wait_idle().await.expect("worker alive");
    h.reset();
    let snap = h.sync().await.expect("worker alive");
    assert_eq!(snap.results.total, 20);
    assert_eq!(snap.results.page.current_page, 1);
}

#[tokio::test]
/// What: Load-more accumulates in infinite mode through the worker
///
/// - Input: Size 6, two load-more steps each awaited
/// - Output: 18 items then has_more still true
async fn load_more_through_worker() {
    let h = spawn(PaginationMode::Infinite, 6, LatencyProfile::ZERO);
    for _ in 0..2 {
        h.load_more();
        h.wait_idle().await.expect("worker alive");
    }
    let snap = h.snapshot();
    assert_eq!(snap.results.items.len(), 18);
    assert!(snap.results.page.has_more);
}

#[tokio::test]
/// What: A reported failure lands in the Error phase and refresh recovers
///
/// - Input: Start a slow page load, fail it, then refresh after changing sort
/// - Output: Error snapshot; after refresh default sort on page 1 and Idle
async fn failure_and_refresh() {
    let h = spawn(PaginationMode::Paged, 4, uniform(40));
    h.set_sort(SortKey::PriceHighLow);
    h.next_page();
    h.send(storefront::app::StoreCommand::FailLoad("backend unavailable".into()));
    let failed = h.wait_idle().await.expect("worker alive");
    assert_eq!(
        failed.phase,
        LoadPhase::Error("fetch failed: backend unavailable".into())
    );
    h.next_page();
    assert!(matches!(
        h.sync().await.expect("worker alive").phase,
        LoadPhase::Error(_)
    ));
    h.refresh();
    let refreshed = h.wait_idle().await.expect("worker alive");
    assert_eq!(refreshed.phase, LoadPhase::Idle);
    assert_eq!(refreshed.results.page.current_page, 1);
    assert_eq!(refreshed.results.items[0].id, "p17");
}

#[tokio::test]
/// What: Favorites and cart round-trip through the handle and event stream
///
/// - Input: Toggle p1 twice and p2 once; add p3 to the cart
/// - Output: is_favorite answers; cart notice and favorite events delivered
async fn favorites_and_cart_events() {
    let catalog = Arc::new(mock::builtin().expect("bundled catalog"));
    let (h, mut events) = spawn_store_worker(
        Storefront::new(catalog, PaginationMode::Paged, 6),
        LatencyProfile::ZERO,
    );
    h.toggle_favorite("p1");
    h.toggle_favorite("p1");
    h.toggle_favorite("p2");
    h.add_to_cart("p3");
    assert_eq!(h.is_favorite("p1").await, Some(false));
    assert_eq!(h.is_favorite("p2").await, Some(true));

    let mut notices = Vec::new();
    let mut toggles = 0;
    while let Ok(ev) = events.try_recv() {
        match ev {
            StoreEvent::AddedToCart(n) => notices.push(n),
            StoreEvent::FavoriteToggled { .. } => toggles += 1,
            _ => {}
        }
    }
    assert_eq!(toggles, 3);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].name, "Wireless Charging Pad");
    h.shutdown().await;
    assert!(h.sync().await.is_none());
}
