//! Pagination and derived-view types.

use std::sync::Arc;

use serde::Serialize;

use crate::state::types::Product;

/// How the derived list is windowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Discrete pages with next/previous/go-to navigation.
    #[default]
    Paged,
    /// Infinite scroll: each "load more" appends one page-sized increment.
    Infinite,
}

impl PaginationMode {
    /// Return the string key used in settings files.
    #[must_use]
    pub const fn as_config_key(&self) -> &'static str {
        match self {
            Self::Paged => "paged",
            Self::Infinite => "infinite",
        }
    }

    /// Parse a pagination mode from its settings key or aliases.
    ///
    /// Inputs: `s` config string (case-insensitive).
    ///
    /// Output: `Some(PaginationMode)` on recognized value; `None` otherwise.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "paged" | "pages" | "discrete" => Some(Self::Paged),
            "infinite" | "load-more" | "accumulate" | "scroll" => Some(Self::Infinite),
            _ => None,
        }
    }
}

/// Portion of the filtered list handed to the presentation layer.
///
/// Precondition for both variants: `page >= 1` and `size >= 1`. The session
/// never builds a window that violates this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Items `[(page - 1) * size, page * size)`.
    Page {
        /// 1-based page number.
        page: usize,
        /// Items per page.
        size: usize,
    },
    /// The first `count` items; `size` is the increment used by "load more".
    Accumulated {
        /// Number of items loaded so far.
        count: usize,
        /// Items added per increment.
        size: usize,
    },
}

impl Window {
    /// Exclusive upper bound of the window before clamping to the list length.
    #[must_use]
    pub const fn upper_bound(&self) -> usize {
        match *self {
            Self::Page { page, size } => page.saturating_mul(size),
            Self::Accumulated { count, .. } => count,
        }
    }

    /// Configured page/increment size.
    #[must_use]
    pub const fn size(&self) -> usize {
        match *self {
            Self::Page { size, .. } | Self::Accumulated { size, .. } => size,
        }
    }
}

/// Pagination metadata accompanying a derived result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    /// Mode the window was computed in.
    pub mode: PaginationMode,
    /// Current page (paged) or number of increments loaded (infinite); 1-based.
    pub current_page: usize,
    /// `ceil(total / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    /// Items per page or per increment.
    pub page_size: usize,
    /// 1-based index of the first visible item; zero when the window is empty.
    pub start_index: usize,
    /// 1-based index of the last visible item; zero when the window is empty.
    pub end_index: usize,
    /// More matches exist beyond the window.
    pub has_more: bool,
    /// Earlier pages exist (always false in infinite mode).
    pub has_prev: bool,
}

/// Output of the query engine: an ordered view over catalog records.
#[derive(Debug, Clone, Default)]
pub struct DerivedResultSet {
    /// Visible products, shared with the catalog (never copied).
    pub items: Vec<Arc<Product>>,
    /// Post-filter, pre-window match count.
    pub total: usize,
    /// Window metadata.
    pub page: PageInfo,
}

impl DerivedResultSet {
    /// Identifiers of the visible products in order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|p| p.id.as_str()).collect()
    }

    /// Whether the window holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Loading state of the pagination state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Data settled.
    #[default]
    Idle,
    /// First catalog load or a refresh in progress.
    LoadingInitial,
    /// Discrete page transition in progress.
    LoadingPage {
        /// Page being loaded.
        target: usize,
    },
    /// Infinite-scroll increment in progress.
    LoadingMore,
    /// The last fetch failed; `refresh` recovers.
    Error(String),
}

impl LoadPhase {
    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::LoadingInitial | Self::LoadingPage { .. } | Self::LoadingMore
        )
    }
}

/// What the presentation layer observes: the latest derived set plus load state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Monotonic publish counter.
    pub revision: u64,
    /// Derived list for the current filters, sort and window.
    pub results: Arc<DerivedResultSet>,
    /// Pagination state machine phase.
    pub phase: LoadPhase,
}
