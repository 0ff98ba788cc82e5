use tokio::sync::{mpsc, oneshot, watch};

use crate::state::{CategoryChoice, Snapshot, SortKey};

use super::worker::StoreCommand;

/// What: Cloneable front door to the store worker.
///
/// Details:
/// - Fire-and-forget methods mirror the session mutators; a closed worker is
///   logged and otherwise ignored.
/// - Async queries return `None` once the worker has stopped.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    /// Command channel into the worker.
    tx: mpsc::UnboundedSender<StoreCommand>,
    /// Latest published snapshot.
    snapshots: watch::Receiver<Snapshot>,
}

impl StoreHandle {
    /// Wrap the worker's command sender and snapshot receiver.
    pub(crate) const fn new(
        tx: mpsc::UnboundedSender<StoreCommand>,
        snapshots: watch::Receiver<Snapshot>,
    ) -> Self {
        Self { tx, snapshots }
    }

    /// Queue `cmd` for the worker.
    pub fn send(&self, cmd: StoreCommand) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("[Worker] Store worker is gone; command dropped");
        }
    }

    /// Set the search text.
    pub fn set_search(&self, text: impl Into<String>) {
        self.send(StoreCommand::SetSearch(text.into()));
    }

    /// Select one category or "All".
    pub fn set_category(&self, choice: CategoryChoice) {
        self.send(StoreCommand::SetCategory(choice));
    }

    /// Change the sort key.
    pub fn set_sort(&self, sort: SortKey) {
        self.send(StoreCommand::SetSort(sort));
    }

    /// Replace the price range.
    pub fn set_price_range(&self, min: f64, max: f64) {
        self.send(StoreCommand::SetPriceRange { min, max });
    }

    /// Clear all filters.
    pub fn clear_filters(&self) {
        self.send(StoreCommand::ClearFilters);
    }

    /// Restore filters, sort and cursor to their initial values.
    pub fn reset(&self) {
        self.send(StoreCommand::Reset);
    }

    /// Go to the next page.
    pub fn next_page(&self) {
        self.send(StoreCommand::NextPage);
    }

    /// Go to the previous page.
    pub fn prev_page(&self) {
        self.send(StoreCommand::PrevPage);
    }

    /// Go to page `page`.
    pub fn go_to_page(&self, page: usize) {
        self.send(StoreCommand::GoToPage(page));
    }

    /// Append one increment.
    pub fn load_more(&self) {
        self.send(StoreCommand::LoadMore);
    }

    /// Refresh back to the initial state after the configured delay.
    pub fn refresh(&self) {
        self.send(StoreCommand::Refresh);
    }

    /// Toggle a favorite.
    pub fn toggle_favorite(&self, id: impl Into<String>) {
        self.send(StoreCommand::ToggleFavorite(id.into()));
    }

    /// Add one unit of a product to the cart.
    pub fn add_to_cart(&self, id: impl Into<String>) {
        self.send(StoreCommand::AddToCart(id.into()));
    }

    /// Whether `id` is a favorite, after all earlier commands ran.
    pub async fn is_favorite(&self, id: impl Into<String>) -> Option<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::IsFavorite(id.into(), reply));
        rx.await.ok()
    }

    /// What: Wait until every earlier command has been applied.
    ///
    /// Output:
    /// - The snapshot at that point; loads started by those commands may still
    ///   be pending.
    pub async fn sync(&self) -> Option<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::Sync(reply));
        rx.await.ok()
    }

    /// What: Wait until earlier commands ran and no load is in flight.
    ///
    /// Output:
    /// - The first settled snapshot (`Idle` or `Error`).
    pub async fn wait_idle(&self) -> Option<Snapshot> {
        let synced = self.sync().await?;
        if !synced.phase.is_loading() {
            return Some(synced);
        }
        let mut rx = self.snapshots.clone();
        let settled = rx.wait_for(|s| !s.phase.is_loading()).await.ok()?;
        Some(settled.clone())
    }

    /// Latest published snapshot without waiting.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Flush favorites and stop the worker.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        self.send(StoreCommand::Shutdown(done));
        let _ = rx.await;
    }
}
