//! Query engine: pure filter, sort and window stages over the catalog.

pub mod filter;
pub mod query;
pub mod sort;
pub mod window;

// Re-export public APIs so callers can use `crate::logic::...`
pub use filter::{apply_filters, matches_category};
pub use query::{compute, select};
pub use sort::{compare_names, sort_products};
pub use window::apply_window;
