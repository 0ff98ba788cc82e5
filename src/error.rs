//! Error taxonomy shared by the catalog, the query layer and the session.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the storefront's validation boundaries.
///
/// Session mutators never return these directly: rejected input is logged and
/// treated as a no-op so the presentation layer keeps its last snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Price range with `min > max` or a non-finite bound.
    #[error("invalid price range: min {min} is not <= max {max}")]
    InvalidRange {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },

    /// Requested page is outside `[1, total_pages]`.
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange {
        /// Requested page (1-based).
        page: usize,
        /// Number of pages available for the active filters.
        total_pages: usize,
    },

    /// Two catalog records share an identifier.
    #[error("duplicate product id '{0}'")]
    DuplicateProductId(String),

    /// A catalog record violates a data-model invariant.
    #[error("invalid product '{id}': {reason}")]
    InvalidProduct {
        /// Identifier of the offending record.
        id: String,
        /// Which invariant failed.
        reason: String,
    },

    /// Text did not name one of the fixed categories.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// Text did not name a sort key.
    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    /// Filesystem access failed.
    #[error("failed to access '{path}': {source}")]
    Io {
        /// File that was being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A page fetch failed; drives the `error` load phase.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl StoreError {
    /// What: Wrap an IO error together with the path it concerns.
    ///
    /// Inputs:
    /// - `path`: File being accessed
    /// - `source`: Error returned by the filesystem call
    ///
    /// Output:
    /// - `StoreError::Io` carrying both.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    /// What: Error messages name the offending values
    ///
    /// - Input: Range and page errors
    /// - Output: Display text includes the numbers
    fn error_display_mentions_values() {
        let e = StoreError::InvalidRange { min: 10.0, max: 2.0 };
        assert!(e.to_string().contains("min 10"));
        let e = StoreError::PageOutOfRange {
            page: 4,
            total_pages: 2,
        };
        assert_eq!(e.to_string(), "page 4 is outside 1..=2");
    }
}
