use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, sleep},
};

use crate::config::Settings;
use crate::error::StoreError;
use crate::session::{LoadKind, LoadTicket, StoreEvent, Storefront};
use crate::state::{CategoryChoice, Snapshot, SortKey};

use super::handle::StoreHandle;

/// Messages accepted by the store worker.
#[derive(Debug)]
pub enum StoreCommand {
    /// Replace the search text.
    SetSearch(String),
    /// Select one category or "All".
    SetCategory(CategoryChoice),
    /// Change the sort key.
    SetSort(SortKey),
    /// Replace the price range; inverted bounds are ignored.
    SetPriceRange {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Clear categories, search text and price range.
    ClearFilters,
    /// Restore the initial state immediately.
    Reset,
    /// Start loading the next page.
    NextPage,
    /// Start loading the previous page.
    PrevPage,
    /// Start loading a specific page.
    GoToPage(usize),
    /// Start appending one increment.
    LoadMore,
    /// Start a delayed refresh to the initial state.
    Refresh,
    /// Toggle a favorite.
    ToggleFavorite(String),
    /// Add one unit of a product to the cart.
    AddToCart(String),
    /// Ask whether a product is a favorite.
    IsFavorite(String, oneshot::Sender<bool>),
    /// Barrier: replies with the snapshot after all earlier commands ran.
    Sync(oneshot::Sender<Snapshot>),
    /// Report that the in-flight load failed with this backend message.
    FailLoad(String),
    /// A simulated fetch resolved.
    LoadFinished(LoadTicket),
    /// Flush favorites and stop; replies once done.
    Shutdown(oneshot::Sender<()>),
}

/// What: Simulated fetch latency per transition.
///
/// Details:
/// - Pages up to `early_pages` resolve faster than later ones, mimicking a
///   backend that caches the first pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Delay for pages after `early_pages`.
    pub page: Duration,
    /// Delay for pages up to `early_pages`.
    pub early_page: Duration,
    /// Pages considered early.
    pub early_pages: usize,
    /// Delay for a load-more increment.
    pub load_more: Duration,
    /// Delay for a refresh.
    pub refresh: Duration,
}

impl LatencyProfile {
    /// Every transition resolves on the next scheduler turn.
    pub const ZERO: Self = Self {
        page: Duration::ZERO,
        early_page: Duration::ZERO,
        early_pages: 0,
        load_more: Duration::ZERO,
        refresh: Duration::ZERO,
    };

    /// Build the profile from the `*_latency_ms` settings.
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            page: Duration::from_millis(settings.page_latency_ms),
            early_page: Duration::from_millis(settings.early_page_latency_ms),
            early_pages: settings.early_pages,
            load_more: Duration::from_millis(settings.load_more_latency_ms),
            refresh: Duration::from_millis(settings.refresh_delay_ms),
        }
    }

    /// Delay before `kind` resolves.
    #[must_use]
    pub const fn delay_for(&self, kind: LoadKind) -> Duration {
        match kind {
            LoadKind::Page(p) if p <= self.early_pages => self.early_page,
            LoadKind::Page(_) => self.page,
            LoadKind::More => self.load_more,
            LoadKind::Refresh => self.refresh,
        }
    }
}

/// What: Spawn the single-writer worker that owns `store`.
///
/// Inputs:
/// - `store`: Session state moved into the worker
/// - `latency`: Simulated fetch delays
///
/// Output:
/// - A cloneable handle for sending commands and the event stream.
///
/// Details:
/// - Commands run one at a time to completion, so the pagination phase gates
///   re-entrancy without locks.
/// - Started loads sleep in a separate task and post `LoadFinished` back
///   through a weak sender; the worker exits once every handle is dropped even
///   if loads are still pending.
/// - Favorites are flushed after each command when they changed.
pub fn spawn_store_worker(
    mut store: Storefront,
    latency: LatencyProfile,
) -> (StoreHandle, mpsc::UnboundedReceiver<StoreEvent>) {
    let events = store.subscribe();
    let snapshots = store.watch();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<StoreCommand>();
    let loopback = cmd_tx.downgrade();
    tokio::spawn(async move {
        let mut in_flight: Option<LoadTicket> = None;
        while let Some(cmd) = cmd_rx.recv().await {
            if let StoreCommand::Shutdown(done) = cmd {
                store.flush_favorites();
                let _ = done.send(());
                break;
            }
            if let Some(ticket) = apply_command(&mut store, cmd, &mut in_flight) {
                in_flight = Some(ticket);
                let delay = latency.delay_for(ticket.kind());
                tracing::debug!(kind = ?ticket.kind(), ?delay, "[Worker] Load started");
                let tx = loopback.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    if let Some(tx) = tx.upgrade() {
                        let _ = tx.send(StoreCommand::LoadFinished(ticket));
                    }
                });
            }
            store.flush_favorites();
        }
        store.flush_favorites();
        tracing::debug!("[Worker] Store worker stopped");
    });
    (StoreHandle::new(cmd_tx, snapshots), events)
}

/// What: Run one command against the store.
///
/// Output:
/// - The ticket of a newly started load, if the command started one.
fn apply_command(
    store: &mut Storefront,
    cmd: StoreCommand,
    in_flight: &mut Option<LoadTicket>,
) -> Option<LoadTicket> {
    match cmd {
        StoreCommand::SetSearch(text) => {
            store.set_search(&text);
            None
        }
        StoreCommand::SetCategory(choice) => {
            store.set_category(choice);
            None
        }
        StoreCommand::SetSort(sort) => {
            store.set_sort(sort);
            None
        }
        StoreCommand::SetPriceRange { min, max } => {
            store.set_price_bounds(min, max);
            None
        }
        StoreCommand::ClearFilters => {
            store.clear_filters();
            None
        }
        StoreCommand::Reset => {
            store.reset();
            None
        }
        StoreCommand::NextPage => store.request_next_page(),
        StoreCommand::PrevPage => store.request_prev_page(),
        StoreCommand::GoToPage(page) => store.request_page(page),
        StoreCommand::LoadMore => store.request_load_more(),
        StoreCommand::Refresh => store.request_refresh(),
        StoreCommand::ToggleFavorite(id) => {
            store.toggle_favorite(&id);
            None
        }
        StoreCommand::AddToCart(id) => {
            store.add_to_cart(&id);
            None
        }
        StoreCommand::IsFavorite(id, reply) => {
            let _ = reply.send(store.is_favorite(&id));
            None
        }
        StoreCommand::Sync(reply) => {
            let _ = reply.send(store.snapshot());
            None
        }
        StoreCommand::FailLoad(message) => {
            if let Some(ticket) = in_flight.take() {
                store.fail_load(ticket, StoreError::Fetch(message).to_string());
            }
            None
        }
        StoreCommand::LoadFinished(ticket) => {
            if *in_flight == Some(ticket) {
                *in_flight = None;
            }
            if !store.complete_load(ticket) {
                tracing::debug!(kind = ?ticket.kind(), "[Worker] Ignored stale load result");
            }
            None
        }
        StoreCommand::Shutdown(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Early pages use the faster latency tier
    ///
    /// - Input: Default settings (early_pages = 2)
    /// - Output: Pages 1-2 at 300ms, page 3 at 400ms, load-more 500ms, refresh 800ms
    fn latency_tiers() {
        let l = LatencyProfile::from_settings(&Settings::default());
        assert_eq!(l.delay_for(LoadKind::Page(2)), Duration::from_millis(300));
        assert_eq!(l.delay_for(LoadKind::Page(3)), Duration::from_millis(400));
        assert_eq!(l.delay_for(LoadKind::More), Duration::from_millis(500));
        assert_eq!(l.delay_for(LoadKind::Refresh), Duration::from_millis(800));
    }
}
