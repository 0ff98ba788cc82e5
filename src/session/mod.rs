//! Session state: the single owned object holding what the user currently
//! wants to see.
//!
//! Every mutator applies its change (command) and then republishes a freshly
//! computed [`DerivedResultSet`] (query). Filter and sort changes rerun the
//! filter and sort stages and return to the first page; pagination changes only
//! re-window the cached matches.

pub mod cart;
pub mod events;
pub mod favorites;
pub mod pagination;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::catalog::Catalog;
use crate::logic::{apply_window, select};
use crate::state::{
    Category, CategoryChoice, DerivedResultSet, FilterSpec, LoadPhase, PaginationMode, PriceRange,
    Product, Snapshot, SortKey,
};

pub use cart::{Cart, CartNotice};
pub use events::{Publisher, StoreEvent};
pub use favorites::{FavoritesLedger, FavoritesStore, JsonFavoritesFile, MemoryFavorites};
pub use pagination::{LoadKind, LoadTicket, Pager, validate_page};

/// What: Filter/sort/pagination state plus favorites and cart for one session.
///
/// Details:
/// - Explicitly constructed and owned; pass it (or a handle to the worker that
///   owns it) to the presentation layer.
/// - Page transitions are two-phase: `request_*` starts the load and returns a
///   [`LoadTicket`], [`Storefront::complete_load`] applies it. The immediate
///   variants (`next_page`, `load_more`, ...) do both in one call.
pub struct Storefront {
    /// Shared immutable catalog.
    catalog: Arc<Catalog>,
    /// Active filters.
    filters: FilterSpec,
    /// Active sort key.
    sort: SortKey,
    /// Sort restored by `reset` and `refresh`.
    default_sort: SortKey,
    /// Pagination cursor and load phase.
    pager: Pager,
    /// Favorite product ids.
    favorites: FavoritesLedger,
    /// Where favorites are persisted.
    favorites_store: Box<dyn FavoritesStore>,
    /// Cart quantities.
    cart: Cart,
    /// Filtered and sorted matches for the current filters, before windowing.
    matches: Vec<Arc<Product>>,
    /// Last published window.
    current: Arc<DerivedResultSet>,
    /// Publish counter.
    revision: u64,
    /// Snapshot and event fan-out.
    publisher: Publisher,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("pager", &self.pager)
            .field("favorites", &self.favorites.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// What: Build a session over `catalog` and publish the first page.
    ///
    /// Inputs:
    /// - `catalog`: Shared catalog source
    /// - `mode`: Windowing mode for this deployment
    /// - `page_size`: Items per page or increment (raised to at least 1)
    ///
    /// Output:
    /// - Idle session on page 1 with no filters, newest-first sort, in-memory
    ///   favorites.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, mode: PaginationMode, page_size: usize) -> Self {
        let pager = Pager::new(mode, page_size);
        let filters = FilterSpec::default();
        let sort = SortKey::default();
        let matches = select(&catalog, &filters, sort);
        let current = Arc::new(apply_window(&matches, pager.window()));
        let publisher = Publisher::new(Snapshot {
            revision: 0,
            results: Arc::clone(&current),
            phase: LoadPhase::Idle,
        });
        Self {
            catalog,
            filters,
            sort,
            default_sort: sort,
            pager,
            favorites: FavoritesLedger::default(),
            favorites_store: Box::new(MemoryFavorites),
            cart: Cart::default(),
            matches,
            current,
            revision: 0,
            publisher,
        }
    }

    /// What: Use `sort` as the initial and reset sort key.
    ///
    /// Output:
    /// - The session re-sorted and republished on page 1.
    #[must_use]
    pub fn with_default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = sort;
        self.set_sort(sort);
        self
    }

    /// What: Inject the favorites storage capability and load stored ids.
    ///
    /// Inputs:
    /// - `store`: Storage used for load now and for later flushes
    ///
    /// Details:
    /// - A failed load is logged, leaves the ledger empty and keeps favorites in
    ///   memory for the session; the unreadable store is never written.
    #[must_use]
    pub fn with_favorites_store(mut self, store: Box<dyn FavoritesStore>) -> Self {
        match store.load() {
            Ok(ids) => {
                tracing::info!(count = ids.len(), "[Favorites] Loaded stored favorites");
                self.favorites = FavoritesLedger::with_ids(ids);
                self.favorites_store = store;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "[Favorites] Failed to load stored favorites; keeping them in memory"
                );
                self.favorites_store = Box::new(MemoryFavorites);
            }
        }
        self
    }

    // ----- queries -----

    /// Current derived window (`getDerivedList`).
    #[must_use]
    pub fn derived(&self) -> Arc<DerivedResultSet> {
        Arc::clone(&self.current)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            results: Arc::clone(&self.current),
            phase: self.pager.phase().clone(),
        }
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Active sort key.
    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Pagination cursor.
    #[must_use]
    pub const fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Current load phase.
    #[must_use]
    pub const fn phase(&self) -> &LoadPhase {
        self.pager.phase()
    }

    /// Shared catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Favorites ledger.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesLedger {
        &self.favorites
    }

    /// Cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Receiver that always holds the latest snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.publisher.watch()
    }

    /// Register for change events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreEvent> {
        self.publisher.subscribe()
    }

    // ----- filter and sort mutators -----

    /// What: Set the search text.
    ///
    /// Inputs:
    /// - `text`: Raw input; surrounding whitespace is trimmed
    ///
    /// Output:
    /// - `true` when the text changed and results were recomputed.
    pub fn set_search(&mut self, text: &str) -> bool {
        let text = text.trim();
        if self.filters.search == text {
            return false;
        }
        tracing::debug!(query = %text, "[Store] Search changed");
        self.filters.search = text.to_string();
        self.requery();
        true
    }

    /// What: Select one category or "All".
    ///
    /// Inputs:
    /// - `choice`: `Only(c)` replaces the selection with `c`; `All` clears it
    ///
    /// Output:
    /// - `true` when the selection changed.
    pub fn set_category(&mut self, choice: CategoryChoice) -> bool {
        let next: std::collections::BTreeSet<Category> = match choice {
            CategoryChoice::All => std::collections::BTreeSet::new(),
            CategoryChoice::Only(c) => std::iter::once(c).collect(),
        };
        if self.filters.categories == next {
            return false;
        }
        tracing::debug!(?choice, "[Store] Category changed");
        self.filters.categories = next;
        self.requery();
        true
    }

    /// What: Change the sort key.
    ///
    /// Output:
    /// - `true` when the key changed.
    pub fn set_sort(&mut self, sort: SortKey) -> bool {
        if self.sort == sort {
            return false;
        }
        tracing::debug!(sort = sort.as_config_key(), "[Store] Sort changed");
        self.sort = sort;
        self.requery();
        true
    }

    /// What: Replace the price range.
    ///
    /// Output:
    /// - `true` when the range changed.
    pub fn set_price_range(&mut self, range: PriceRange) -> bool {
        if self.filters.price == range {
            return false;
        }
        tracing::debug!(min = range.min(), max = range.max(), "[Store] Price range changed");
        self.filters.price = range;
        self.requery();
        true
    }

    /// What: Set the price range from raw bounds.
    ///
    /// Inputs:
    /// - `min`, `max`: Inclusive bounds
    ///
    /// Output:
    /// - `false` without any change when `min > max` or a bound is NaN.
    pub fn set_price_bounds(&mut self, min: f64, max: f64) -> bool {
        match PriceRange::new(min, max) {
            Ok(range) => self.set_price_range(range),
            Err(e) => {
                tracing::warn!(error = %e, "[Store] Ignoring price range");
                false
            }
        }
    }

    /// What: Clear categories, search text and price range together.
    ///
    /// Output:
    /// - `false` and no notification when no filter is active.
    pub fn clear_filters(&mut self) -> bool {
        if !self.filters.is_active() {
            return false;
        }
        tracing::debug!("[Store] Filters cleared");
        self.filters = FilterSpec::default();
        self.requery();
        true
    }

    /// Restore filters, sort and cursor to their initial values immediately.
    pub fn reset(&mut self) {
        self.filters = FilterSpec::default();
        self.sort = self.default_sort;
        self.requery();
    }

    // ----- pagination -----

    /// Start loading the page after the current one.
    pub fn request_next_page(&mut self) -> Option<LoadTicket> {
        let target = self.pager.page().saturating_add(1);
        self.request_page(target)
    }

    /// Start loading the page before the current one.
    pub fn request_prev_page(&mut self) -> Option<LoadTicket> {
        let target = self.pager.page().saturating_sub(1);
        self.request_page(target)
    }

    /// What: Start loading page `page`.
    ///
    /// Output:
    /// - `Some(ticket)` with the phase published as `LoadingPage`; `None` when
    ///   the request is out of range, targets the current page, or another load
    ///   is in flight.
    pub fn request_page(&mut self, page: usize) -> Option<LoadTicket> {
        let ticket = self.pager.begin_page(page, self.current.page.total_pages)?;
        self.publish_phase();
        Some(ticket)
    }

    /// Start appending one increment (infinite mode).
    pub fn request_load_more(&mut self) -> Option<LoadTicket> {
        let ticket = self.pager.begin_load_more(self.current.page.has_more)?;
        self.publish_phase();
        Some(ticket)
    }

    /// Start a refresh back to the initial state.
    pub fn request_refresh(&mut self) -> Option<LoadTicket> {
        let ticket = self.pager.begin_refresh()?;
        self.publish_phase();
        Some(ticket)
    }

    /// What: Apply a finished load.
    ///
    /// Inputs:
    /// - `ticket`: Ticket from a `request_*` call
    ///
    /// Output:
    /// - `true` when the cursor moved and the new window was published; `false`
    ///   when the ticket is stale.
    ///
    /// Details:
    /// - The page number and the published items change in the same publish.
    /// - A refresh also restores default filters and sort.
    pub fn complete_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.pager.complete(ticket) {
            return false;
        }
        if ticket.kind() == LoadKind::Refresh {
            self.filters = FilterSpec::default();
            self.sort = self.default_sort;
            self.matches = select(&self.catalog, &self.filters, self.sort);
            tracing::info!(total = self.matches.len(), "[Store] Refreshed");
        }
        self.rewindow();
        true
    }

    /// What: Record a failed load.
    ///
    /// Output:
    /// - `true` when the session moved to `Error`; stale failures are ignored.
    pub fn fail_load(&mut self, ticket: LoadTicket, message: impl Into<String>) -> bool {
        if !self.pager.fail(ticket, message) {
            return false;
        }
        tracing::warn!(phase = ?self.pager.phase(), "[Store] Load failed");
        self.publish_phase();
        true
    }

    /// Advance one page without simulated latency.
    pub fn next_page(&mut self) -> bool {
        let ticket = self.request_next_page();
        self.finish_now(ticket)
    }

    /// Go back one page without simulated latency.
    pub fn prev_page(&mut self) -> bool {
        let ticket = self.request_prev_page();
        self.finish_now(ticket)
    }

    /// Jump to `page` without simulated latency.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let ticket = self.request_page(page);
        self.finish_now(ticket)
    }

    /// Append one increment without simulated latency.
    pub fn load_more(&mut self) -> bool {
        let ticket = self.request_load_more();
        self.finish_now(ticket)
    }

    /// Refresh without simulated latency.
    pub fn refresh(&mut self) -> bool {
        let ticket = self.request_refresh();
        self.finish_now(ticket)
    }

    // ----- favorites and cart -----

    /// What: Toggle `id` in the favorites ledger.
    ///
    /// Output:
    /// - Membership after the toggle. The derived list is not touched.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let favorite = self.favorites.toggle(id);
        tracing::debug!(id, favorite, "[Favorites] Toggled");
        self.publisher.emit(&StoreEvent::FavoriteToggled {
            id: id.to_string(),
            favorite,
        });
        favorite
    }

    /// Persist favorites if they changed since the last flush.
    pub fn flush_favorites(&mut self) {
        self.favorites.maybe_flush(self.favorites_store.as_ref());
    }

    /// What: Add one unit of product `id` to the cart.
    ///
    /// Output:
    /// - The notice also sent to subscribers; `None` for unknown ids.
    pub fn add_to_cart(&mut self, id: &str) -> Option<CartNotice> {
        let Some(product) = self.catalog.get(id) else {
            tracing::warn!(id, "[Store] Add to cart for unknown product");
            return None;
        };
        let notice = self.cart.add(product);
        tracing::debug!(id, quantity = notice.quantity, "[Store] Added to cart");
        self.publisher.emit(&StoreEvent::AddedToCart(notice.clone()));
        Some(notice)
    }

    // ----- internals -----

    /// Rerun filter and sort, return to the first page, publish.
    fn requery(&mut self) {
        self.pager.reset();
        self.matches = select(&self.catalog, &self.filters, self.sort);
        self.rewindow();
    }

    /// Slice the cached matches for the current cursor and publish.
    fn rewindow(&mut self) {
        self.current = Arc::new(apply_window(&self.matches, self.pager.window()));
        self.revision += 1;
        self.publisher.publish(self.snapshot());
        self.publisher.emit(&StoreEvent::ResultsChanged {
            revision: self.revision,
            total: self.current.total,
        });
    }

    /// Publish a phase change that leaves the results untouched.
    fn publish_phase(&mut self) {
        self.revision += 1;
        self.publisher.publish(self.snapshot());
        self.publisher
            .emit(&StoreEvent::PhaseChanged(self.pager.phase().clone()));
    }

    /// Complete `ticket` immediately, if one was issued.
    fn finish_now(&mut self, ticket: Option<LoadTicket>) -> bool {
        ticket.is_some_and(|t| self.complete_load(t))
    }
}
