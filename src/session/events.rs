use tokio::sync::{mpsc, watch};

use crate::session::cart::CartNotice;
use crate::state::{LoadPhase, Snapshot};

/// Change notifications delivered to event subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A new derived result set was published.
    ResultsChanged {
        /// Snapshot revision carrying the new results.
        revision: u64,
        /// Post-filter match count.
        total: usize,
    },
    /// The pagination state machine changed phase without new results.
    PhaseChanged(LoadPhase),
    /// A favorite was added or removed.
    FavoriteToggled {
        /// Product id.
        id: String,
        /// Membership after the toggle.
        favorite: bool,
    },
    /// A product was added to the cart.
    AddedToCart(CartNotice),
}

/// What: Fan-out of snapshots and events to the presentation layer.
///
/// Details:
/// - Snapshots go through a `watch` channel: observers only ever see the most
///   recent one.
/// - Events go to every live `mpsc` subscriber; closed subscribers are pruned
///   on the next emit.
#[derive(Debug)]
pub struct Publisher {
    /// Latest snapshot.
    snapshot_tx: watch::Sender<Snapshot>,
    /// Event subscribers.
    subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl Publisher {
    /// Publisher primed with `initial`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        let (snapshot_tx, _) = watch::channel(initial);
        Self {
            snapshot_tx,
            subscribers: Vec::new(),
        }
    }

    /// Receiver that always holds the latest snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Register a new event subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replace the current snapshot, even when nobody is watching.
    pub fn publish(&self, snapshot: Snapshot) {
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Deliver `event` to every live subscriber.
    pub fn emit(&mut self, event: &StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Watchers see only the latest snapshot; dropped subscribers are pruned
    ///
    /// - Input: Two publishes; one live and one dropped subscriber
    /// - Output: Watch holds revision 2; live subscriber receives the event
    fn publish_and_emit() {
        let mut p = Publisher::new(Snapshot::default());
        let rx = p.watch();
        p.publish(Snapshot {
            revision: 1,
            ..Snapshot::default()
        });
        p.publish(Snapshot {
            revision: 2,
            ..Snapshot::default()
        });
        assert_eq!(rx.borrow().revision, 2);

        let mut live = p.subscribe();
        let dropped = p.subscribe();
        drop(dropped);
        p.emit(&StoreEvent::PhaseChanged(LoadPhase::LoadingMore));
        assert_eq!(p.subscribers.len(), 1);
        assert_eq!(
            live.try_recv().ok(),
            Some(StoreEvent::PhaseChanged(LoadPhase::LoadingMore))
        );
    }
}
