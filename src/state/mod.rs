//! Value types shared by the catalog, the query engine and the session.

pub mod page;
pub mod types;

// Public re-exports to keep `crate::state::*` paths short
pub use page::{DerivedResultSet, LoadPhase, PageInfo, PaginationMode, Snapshot, Window};
pub use types::{Category, CategoryChoice, FilterSpec, PriceRange, Product, SortKey};
