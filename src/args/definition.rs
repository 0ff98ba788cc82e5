//! Command-line argument definition.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::state::{CategoryChoice, PaginationMode, SortKey};

/// Storefront - browse, filter, sort and page through a product catalog
#[derive(Parser, Debug, Default)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "Browse, filter, sort and page through a product catalog", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Load products from this JSON file instead of the bundled catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Settings file (default: ~/.config/storefront/settings.conf)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Case-insensitive substring search over name, brand, category, description and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category to show, or "All"
    #[arg(short, long)]
    pub category: Option<CategoryChoice>,

    /// Sort key (newest-first, price-low-high, price-high-low, name-a-z, name-z-a, rating-high-low)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Lowest price to include
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest price to include
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Items per page or per load-more increment
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Pagination mode (paged or infinite)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<PaginationMode>,

    /// Page to show (paged mode)
    #[arg(short, long, conflicts_with = "load_more")]
    pub page: Option<usize>,

    /// Number of load-more increments to apply (infinite mode)
    #[arg(long)]
    pub load_more: Option<usize>,

    /// Toggle these product ids as favorites
    #[arg(long, num_args = 1..)]
    pub favorite: Vec<String>,

    /// Add these product ids to the cart
    #[arg(long, num_args = 1..)]
    pub add_to_cart: Vec<String>,

    /// Refresh back to the initial state before applying other options
    #[arg(long)]
    pub refresh: bool,

    /// Print the result window as JSON
    #[arg(long)]
    pub json: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `--mode` through the settings-file keys.
fn parse_mode(s: &str) -> Result<PaginationMode, String> {
    PaginationMode::from_config_key(s).ok_or_else(|| format!("unknown pagination mode: {s}"))
}

impl Args {
    /// What: Overlay command-line choices onto loaded settings.
    ///
    /// Inputs:
    /// - `settings`: Settings from `settings.conf`, updated in place
    ///
    /// Details:
    /// - `--load-more` without `--mode` implies infinite mode.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(p) = &self.catalog {
            settings.catalog_file = Some(p.clone());
        }
        if let Some(n) = self.page_size
            && n > 0
        {
            settings.page_size = n;
        }
        if let Some(m) = self.mode {
            settings.pagination_mode = m;
        } else if self.load_more.is_some() {
            settings.pagination_mode = PaginationMode::Infinite;
        }
        if self.json {
            settings.json_output = true;
        }
    }
}

/// What: Determine the log level from arguments and settings.
///
/// Output:
/// - `debug` with `--verbose`; otherwise `--log-level`, falling back to the
///   settings file value.
pub fn determine_log_level(args: &Args, settings: &Settings) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level
            .clone()
            .unwrap_or_else(|| settings.log_level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Category;

    #[test]
    /// What: Flags parse into typed values
    ///
    /// - Input: Category, sort, mode, repeated favorites; bad sort; conflicting paging flags
    /// - Output: Typed enums; both favorites collected; errors for the invalid cases
    fn parses_typed_flags() {
        let args = Args::try_parse_from([
            "storefront",
            "--category",
            "books",
            "--sort",
            "price-low-high",
            "--mode",
            "infinite",
            "--favorite",
            "p1",
            "p2",
        ])
        .expect("valid args");
        assert_eq!(args.category, Some(CategoryChoice::Only(Category::Books)));
        assert_eq!(args.sort, Some(SortKey::PriceLowHigh));
        assert_eq!(args.mode, Some(PaginationMode::Infinite));
        assert_eq!(args.favorite, vec!["p1", "p2"]);
        assert!(Args::try_parse_from(["storefront", "--sort", "cheapest-ish"]).is_err());
        assert!(Args::try_parse_from(["storefront", "--page", "2", "--load-more", "1"]).is_err());
    }

    #[test]
    /// What: Overrides and log level precedence
    ///
    /// - Input: --load-more without --mode, zero page size, --verbose, settings log level
    /// - Output: Infinite mode chosen; page size kept; verbose wins over settings
    fn overrides_and_log_level() {
        let args = Args {
            load_more: Some(2),
            page_size: Some(0),
            verbose: true,
            ..Args::default()
        };
        let mut s = Settings::default();
        args.apply_to(&mut s);
        assert_eq!(s.pagination_mode, PaginationMode::Infinite);
        assert_eq!(s.page_size, 6);
        assert_eq!(determine_log_level(&args, &s), "debug");
        let quiet = Args::default();
        s.log_level = "warn".into();
        assert_eq!(determine_log_level(&quiet, &s), "warn");
    }
}
