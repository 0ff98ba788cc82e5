//! Pagination state machine.
//!
//! Transitions are two-phase: a `begin_*` call moves the machine into a loading
//! phase and hands out a [`LoadTicket`]; the ticket is redeemed with
//! [`Pager::complete`] once the (simulated) fetch resolves. Every filter or sort
//! change bumps the epoch, so tickets issued before it are rejected on arrival.

use crate::error::StoreError;
use crate::state::{LoadPhase, PaginationMode, Window};

/// What a ticket will apply once redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Switch to this page (paged mode).
    Page(usize),
    /// Append one increment (infinite mode).
    More,
    /// Restore the initial state.
    Refresh,
}

/// Proof that a transition was started; carries the epoch it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    kind: LoadKind,
}

impl LoadTicket {
    /// Transition this ticket completes.
    #[must_use]
    pub const fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Epoch the ticket was issued in.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What: Check a requested page against the available range.
///
/// Inputs:
/// - `page`: Requested page (1-based)
/// - `total_pages`: Pages available for the active filters
///
/// Output:
/// - `Ok(page)` when `1 <= page <= total_pages`.
///
/// # Errors
/// - `StoreError::PageOutOfRange` otherwise.
pub fn validate_page(page: usize, total_pages: usize) -> Result<usize, StoreError> {
    if page >= 1 && page <= total_pages {
        Ok(page)
    } else {
        Err(StoreError::PageOutOfRange { page, total_pages })
    }
}

/// Pagination cursor plus load phase.
#[derive(Debug, Clone)]
pub struct Pager {
    /// Windowing mode for this deployment.
    mode: PaginationMode,
    /// Items per page or per increment; at least 1.
    page_size: usize,
    /// Current page in paged mode (1-based).
    page: usize,
    /// Items loaded so far in infinite mode.
    loaded: usize,
    /// State machine phase.
    phase: LoadPhase,
    /// Incremented whenever outstanding tickets must be invalidated.
    epoch: u64,
}

impl Pager {
    /// What: Create a pager positioned on the first page.
    ///
    /// Inputs:
    /// - `mode`: Paged or infinite windowing
    /// - `page_size`: Items per page; values below 1 are raised to 1
    ///
    /// Output:
    /// - Idle pager at page 1 (or one increment loaded).
    #[must_use]
    pub fn new(mode: PaginationMode, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            mode,
            page_size,
            page: 1,
            loaded: page_size,
            phase: LoadPhase::Idle,
            epoch: 0,
        }
    }

    /// Windowing mode.
    #[must_use]
    pub const fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// Items per page or increment.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page (paged mode).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Items loaded so far (infinite mode).
    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Current epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Window describing the current cursor.
    #[must_use]
    pub const fn window(&self) -> Window {
        match self.mode {
            PaginationMode::Paged => Window::Page {
                page: self.page,
                size: self.page_size,
            },
            PaginationMode::Infinite => Window::Accumulated {
                count: self.loaded,
                size: self.page_size,
            },
        }
    }

    /// What: Return to the first page after a filter or sort change.
    ///
    /// Output:
    /// - Cursor at page 1 / one increment, phase `Idle`, epoch advanced so any
    ///   in-flight ticket is ignored when it resolves.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.page = 1;
        self.loaded = self.page_size;
        self.phase = LoadPhase::Idle;
    }

    /// What: Start a discrete page transition.
    ///
    /// Inputs:
    /// - `target`: Page to load
    /// - `total_pages`: Pages available for the active filters
    ///
    /// Output:
    /// - `Some(ticket)` and phase `LoadingPage` when the pager is idle, in paged
    ///   mode, and `target` is in range and differs from the current page;
    ///   `None` otherwise (duplicate triggers are dropped, not queued).
    pub fn begin_page(&mut self, target: usize, total_pages: usize) -> Option<LoadTicket> {
        if self.mode != PaginationMode::Paged || self.phase != LoadPhase::Idle {
            tracing::debug!(target, phase = ?self.phase, "[Pager] Page request ignored");
            return None;
        }
        if let Err(e) = validate_page(target, total_pages) {
            tracing::debug!(error = %e, "[Pager] Page request rejected");
            return None;
        }
        if target == self.page {
            return None;
        }
        self.phase = LoadPhase::LoadingPage { target };
        Some(self.ticket(LoadKind::Page(target)))
    }

    /// What: Start an infinite-scroll increment.
    ///
    /// Inputs:
    /// - `has_more`: Whether matches exist beyond the loaded prefix
    ///
    /// Output:
    /// - `Some(ticket)` and phase `LoadingMore` when idle, in infinite mode and
    ///   more matches exist; `None` otherwise.
    pub fn begin_load_more(&mut self, has_more: bool) -> Option<LoadTicket> {
        if self.mode != PaginationMode::Infinite || self.phase != LoadPhase::Idle || !has_more {
            tracing::debug!(has_more, phase = ?self.phase, "[Pager] Load-more ignored");
            return None;
        }
        self.phase = LoadPhase::LoadingMore;
        Some(self.ticket(LoadKind::More))
    }

    /// What: Start a refresh back to the initial state.
    ///
    /// Output:
    /// - `Some(ticket)` and phase `LoadingInitial`, superseding any in-flight
    ///   page load; `None` when a refresh is already running.
    pub fn begin_refresh(&mut self) -> Option<LoadTicket> {
        if self.phase == LoadPhase::LoadingInitial {
            return None;
        }
        self.epoch += 1;
        self.phase = LoadPhase::LoadingInitial;
        Some(self.ticket(LoadKind::Refresh))
    }

    /// What: Redeem a ticket once its fetch resolved.
    ///
    /// Inputs:
    /// - `ticket`: Ticket returned by a `begin_*` call
    ///
    /// Output:
    /// - `true` when the cursor moved and the phase returned to `Idle`;
    ///   `false` for stale tickets (older epoch) or a phase mismatch.
    pub fn complete(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                kind = ?ticket.kind,
                "[Pager] Dropping stale load result"
            );
            return false;
        }
        match ticket.kind {
            LoadKind::Page(target) => self.page = target,
            LoadKind::More => self.loaded = self.loaded.saturating_add(self.page_size),
            LoadKind::Refresh => {
                self.page = 1;
                self.loaded = self.page_size;
            }
        }
        self.phase = LoadPhase::Idle;
        true
    }

    /// What: Record a failed fetch.
    ///
    /// Inputs:
    /// - `ticket`: Ticket of the failed transition
    /// - `message`: Failure description shown by the presentation layer
    ///
    /// Output:
    /// - `true` and phase `Error` when the ticket is current; stale failures are ignored.
    pub fn fail(&mut self, ticket: LoadTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = LoadPhase::Error(message.into());
        true
    }

    /// Whether `ticket` belongs to this epoch and matches the running transition.
    fn is_current(&self, ticket: LoadTicket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        matches!(
            (&self.phase, ticket.kind),
            (LoadPhase::LoadingPage { target }, LoadKind::Page(p)) if *target == p
        ) || matches!(
            (&self.phase, ticket.kind),
            (LoadPhase::LoadingMore, LoadKind::More) | (LoadPhase::LoadingInitial, LoadKind::Refresh)
        )
    }

    /// Issue a ticket for the current epoch.
    const fn ticket(&self, kind: LoadKind) -> LoadTicket {
        LoadTicket {
            epoch: self.epoch,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Second page request while one is in flight is dropped
    ///
    /// - Input: Two begin_page calls before completing
    /// - Output: One ticket; completing it advances exactly one page
    fn duplicate_page_request_is_dropped() {
        let mut p = Pager::new(PaginationMode::Paged, 4);
        let t = p.begin_page(2, 5).expect("first request starts");
        assert!(p.begin_page(3, 5).is_none());
        assert!(p.begin_page(2, 5).is_none());
        assert!(p.complete(t));
        assert_eq!(p.page(), 2);
        assert_eq!(p.phase(), &LoadPhase::Idle);
    }

    #[test]
    /// What: Out-of-range and same-page requests are rejected
    ///
    /// - Input: Pages 0, 4 of 3, and the current page
    /// - Output: None for each; phase stays Idle
    fn page_guards() {
        let mut p = Pager::new(PaginationMode::Paged, 4);
        assert!(p.begin_page(0, 3).is_none());
        assert!(p.begin_page(4, 3).is_none());
        assert!(p.begin_page(1, 3).is_none());
        assert_eq!(p.phase(), &LoadPhase::Idle);
        assert!(validate_page(4, 3).is_err());
        assert_eq!(validate_page(3, 3).ok(), Some(3));
    }

    #[test]
    /// What: Reset invalidates in-flight tickets
    ///
    /// - Input: Begin page 2, reset (filter change), then complete the old ticket
    /// - Output: Completion rejected; still on page 1
    fn stale_ticket_after_reset() {
        let mut p = Pager::new(PaginationMode::Paged, 4);
        let t = p.begin_page(2, 5).expect("request starts");
        p.reset();
        assert!(!p.complete(t));
        assert_eq!(p.page(), 1);
        assert_eq!(p.phase(), &LoadPhase::Idle);
    }

    #[test]
    /// What: Load-more appends increments and respects has_more and mode
    ///
    /// - Input: Infinite pager size 3; paged pager
    /// - Output: loaded grows by 3; paged pager refuses load-more
    fn load_more_accumulates() {
        let mut p = Pager::new(PaginationMode::Infinite, 3);
        assert_eq!(p.loaded(), 3);
        assert!(p.begin_load_more(false).is_none());
        let t = p.begin_load_more(true).expect("load more starts");
        assert!(p.begin_load_more(true).is_none());
        assert!(p.complete(t));
        assert_eq!(p.loaded(), 6);
        assert_eq!(p.window(), Window::Accumulated { count: 6, size: 3 });
        let mut paged = Pager::new(PaginationMode::Paged, 3);
        assert!(paged.begin_load_more(true).is_none());
        assert!(paged.begin_page(2, 2).is_some());
        let mut inf = Pager::new(PaginationMode::Infinite, 3);
        assert!(inf.begin_page(2, 2).is_none());
    }

    #[test]
    /// What: Failures move to Error; refresh recovers
    ///
    /// - Input: Begin page, fail it, then refresh
    /// - Output: Error phase blocks paging; refresh completes back to Idle on page 1
    fn error_then_refresh() {
        let mut p = Pager::new(PaginationMode::Paged, 2);
        let t = p.begin_page(2, 4).expect("request starts");
        assert!(p.fail(t, "offline"));
        assert_eq!(p.phase(), &LoadPhase::Error("offline".into()));
        assert!(p.begin_page(2, 4).is_none());
        let r = p.begin_refresh().expect("refresh starts");
        assert!(p.begin_refresh().is_none());
        assert!(p.complete(r));
        assert_eq!(p.page(), 1);
        assert_eq!(p.phase(), &LoadPhase::Idle);
    }

    #[test]
    /// What: Page size is clamped to at least one
    ///
    /// - Input: Size 0
    /// - Output: Size 1
    fn zero_page_size_is_clamped() {
        assert_eq!(Pager::new(PaginationMode::Paged, 0).page_size(), 1);
    }
}
