use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{PaginationMode, SortKey};

use super::parsing::{parse_bool, parse_key_value, skip_comment_or_empty};
use super::paths::resolve_settings_config_path;

/// User-tunable runtime settings loaded from `settings.conf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Items per page (paged) or per increment (infinite).
    pub page_size: usize,
    /// Windowing mode for this deployment.
    pub pagination_mode: PaginationMode,
    /// Initial and reset sort key.
    pub sort: SortKey,
    /// Simulated latency for pages after `early_pages`.
    pub page_latency_ms: u64,
    /// Simulated latency for pages up to `early_pages`.
    pub early_page_latency_ms: u64,
    /// Pages served with the faster latency.
    pub early_pages: usize,
    /// Simulated latency for a load-more increment.
    pub load_more_latency_ms: u64,
    /// Simulated latency for a refresh.
    pub refresh_delay_ms: u64,
    /// JSON file persisting favorites; memory-only when unset.
    pub favorites_file: Option<PathBuf>,
    /// JSON catalog to load instead of the bundled one.
    pub catalog_file: Option<PathBuf>,
    /// Print results as JSON by default.
    pub json_output: bool,
    /// Default tracing filter.
    pub log_level: String,
    /// Settings file that was read; `None` when defaults are in effect.
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 6,
            pagination_mode: PaginationMode::Paged,
            sort: SortKey::NewestFirst,
            page_latency_ms: 400,
            early_page_latency_ms: 300,
            early_pages: 2,
            load_more_latency_ms: 500,
            refresh_delay_ms: 800,
            favorites_file: None,
            catalog_file: None,
            json_output: false,
            log_level: "info".to_string(),
            source: None,
        }
    }
}

/// What: Apply `settings.conf` content on top of `out`.
///
/// Inputs:
/// - `content`: File contents
/// - `base_dir`: Directory relative paths are resolved against
/// - `out`: Settings to update in place
///
/// Details:
/// - Unknown keys and unparsable values are skipped; the previous value stays.
pub fn parse_settings(content: &str, base_dir: Option<&Path>, out: &mut Settings) {
    let resolve = |v: &str| -> Option<PathBuf> {
        if v.is_empty() {
            return None;
        }
        let p = PathBuf::from(v);
        Some(match base_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        })
    };
    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((key, val)) = parse_key_value(line) else {
            continue;
        };
        match key.as_str() {
            "page_size" | "items_per_page" => {
                if let Ok(v) = val.parse::<usize>()
                    && v > 0
                {
                    out.page_size = v;
                }
            }
            "pagination_mode" | "pagination" => {
                if let Some(m) = PaginationMode::from_config_key(val) {
                    out.pagination_mode = m;
                }
            }
            "sort" | "sort_by" | "default_sort" => {
                if let Some(s) = SortKey::from_config_key(val) {
                    out.sort = s;
                }
            }
            "page_latency_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.page_latency_ms = v;
                }
            }
            "early_page_latency_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.early_page_latency_ms = v;
                }
            }
            "early_pages" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.early_pages = v;
                }
            }
            "load_more_latency_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.load_more_latency_ms = v;
                }
            }
            "refresh_delay_ms" | "refresh_latency_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.refresh_delay_ms = v;
                }
            }
            "favorites_file" | "favorites_path" => out.favorites_file = resolve(val),
            "catalog_file" | "catalog" => out.catalog_file = resolve(val),
            "json_output" | "json" => out.json_output = parse_bool(val),
            "log_level" => {
                if !val.is_empty() {
                    out.log_level = val.to_string();
                }
            }
            _ => {
                tracing::debug!(key = %key, "[Config] Ignoring unknown settings key");
            }
        }
    }
}

/// What: Load settings from `explicit` or the default location.
///
/// Inputs:
/// - `explicit`: Path given on the command line, if any
///
/// Output:
/// - Parsed settings; defaults when no file exists or it cannot be read.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let mut out = Settings::default();
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(resolve_settings_config_path);
    let Some(path) = path else {
        return out;
    };
    match fs::read_to_string(&path) {
        Ok(content) => {
            parse_settings(&content, path.parent(), &mut out);
            out.source = Some(path.clone());
            tracing::debug!(path = %path.display(), "[Config] Loaded settings");
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "[Config] Could not read settings");
        }
    }
    out
}
