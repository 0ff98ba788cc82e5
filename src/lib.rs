//! Storefront catalog engine: client-side search, category and price filters,
//! sorting, paged or infinite windowing, favorites and cart notifications over
//! an immutable product catalog.
//!
//! The pure query engine lives in [`logic`]; [`session::Storefront`] is the
//! owned state object that applies commands and republishes results;
//! [`app`] wraps it in a single-writer tokio worker.

pub mod app;
pub mod args;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logic;
pub mod session;
pub mod state;

pub use error::StoreError;
