//! Storefront application layer.
//!
//! The session state lives in a single worker task; callers talk to it through
//! a [`StoreHandle`]. The binary entrypoint only parses arguments, sets up
//! logging and calls [`run`].

/// Command-line rendering of result windows.
pub mod output;
/// Store worker, handle and command-line driver.
pub mod runtime;

pub use runtime::{
    LatencyProfile, StoreCommand, StoreHandle, build_storefront, run, spawn_store_worker,
};
