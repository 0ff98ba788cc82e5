//! Async runtime: the store worker, its handle, and the command-line driver.

use std::sync::Arc;

use crate::args::Args;
use crate::catalog::{Catalog, mock, persist};
use crate::config::Settings;
use crate::error::StoreError;
use crate::session::{JsonFavoritesFile, MemoryFavorites, StoreEvent, Storefront};

use super::output::{render_plain, results_view};

mod handle;
mod worker;

pub use handle::StoreHandle;
pub use worker::{LatencyProfile, StoreCommand, spawn_store_worker};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Build a session from settings.
///
/// Inputs:
/// - `settings`: Effective settings (file plus command-line overrides)
///
/// Output:
/// - Session over the configured or bundled catalog, with the configured
///   pagination, default sort and favorites storage.
///
/// # Errors
/// - Catalog read, parse or validation failures.
pub fn build_storefront(settings: &Settings) -> std::result::Result<Storefront, StoreError> {
    let catalog: Catalog = match &settings.catalog_file {
        Some(path) => persist::load_from_disk(path)?,
        None => mock::builtin()?,
    };
    let store = Storefront::new(
        Arc::new(catalog),
        settings.pagination_mode,
        settings.page_size,
    )
    .with_default_sort(settings.sort);
    Ok(match &settings.favorites_file {
        Some(path) => store.with_favorites_store(Box::new(JsonFavoritesFile::new(path.clone()))),
        None => store.with_favorites_store(Box::new(MemoryFavorites)),
    })
}

/// What: Drive one command-line session end to end.
///
/// Inputs:
/// - `args`: Parsed command line
/// - `settings`: Effective settings
///
/// Output:
/// - `Ok(())` after printing the settled window; `Err` when the catalog cannot
///   be loaded or the worker stops unexpectedly.
///
/// Details:
/// - Commands are applied in this order: refresh, filters and sort, paging,
///   favorites, cart. Each paging step waits for the previous load to settle.
pub async fn run(args: &Args, settings: &Settings) -> Result<()> {
    let store = build_storefront(settings)?;
    tracing::info!(
        products = store.catalog().len(),
        mode = settings.pagination_mode.as_config_key(),
        page_size = settings.page_size,
        "[Store] Session ready"
    );
    let (handle, mut events) = spawn_store_worker(store, LatencyProfile::from_settings(settings));

    if args.refresh {
        handle.refresh();
        settle(&handle).await?;
    }
    if let Some(text) = &args.search {
        handle.set_search(text.clone());
    }
    if let Some(choice) = args.category {
        handle.set_category(choice);
    }
    if let Some(sort) = args.sort {
        handle.set_sort(sort);
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        handle.set_price_range(
            args.min_price.unwrap_or(0.0),
            args.max_price.unwrap_or(f64::INFINITY),
        );
    }
    if let Some(page) = args.page {
        handle.go_to_page(page);
        settle(&handle).await?;
    }
    for _ in 0..args.load_more.unwrap_or(0) {
        handle.load_more();
        settle(&handle).await?;
    }
    for id in &args.favorite {
        handle.toggle_favorite(id.clone());
    }
    for id in &args.add_to_cart {
        handle.add_to_cart(id.clone());
    }

    let snap = settle(&handle).await?;
    let mut favorites = Vec::with_capacity(snap.results.items.len());
    for p in &snap.results.items {
        favorites.push(handle.is_favorite(p.id.clone()).await.unwrap_or(false));
    }
    let mut notices = Vec::new();
    while let Ok(ev) = events.try_recv() {
        match ev {
            StoreEvent::AddedToCart(n) => notices.push(n),
            StoreEvent::FavoriteToggled { id, favorite } => {
                tracing::info!(id = %id, favorite, "[Store] Favorite toggled");
            }
            StoreEvent::ResultsChanged { .. } | StoreEvent::PhaseChanged(_) => {}
        }
    }
    let sort = args.sort.unwrap_or(settings.sort);
    let view = results_view(&snap, sort, &favorites, &notices);
    if settings.json_output {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_plain(&view));
    }
    handle.shutdown().await;
    Ok(())
}

/// Wait for the worker to settle, failing when it stopped.
async fn settle(handle: &StoreHandle) -> Result<crate::state::Snapshot> {
    handle
        .wait_idle()
        .await
        .ok_or_else(|| "store worker stopped".into())
}
