//! Storefront binary entrypoint kept minimal. The runtime lives in `app`.

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;

use storefront::{app, args, config};

/// Log timestamp formatter using local time.
struct StorefrontTimer;

impl tracing_subscriber::fmt::time::FormatTime for StorefrontTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// Keeps the non-blocking log writer alive until exit.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Initialize tracing into `<config>/logs/storefront.log`.
///
/// Inputs:
/// - `level`: Filter used when `RUST_LOG` is unset
///
/// Details:
/// - Falls back to stderr when the log file cannot be opened.
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    let log_path = config::logs_dir().join("storefront.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(StorefrontTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(StorefrontTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = args::Args::parse();
    // No subscriber exists yet; settings read failures go to stderr.
    let early = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let mut settings = tracing::subscriber::with_default(early, || {
        config::load_settings(cli.config.as_deref())
    });
    cli.apply_to(&mut settings);
    init_logging(&args::determine_log_level(&cli, &settings));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Storefront starting");
    match &settings.source {
        Some(path) => tracing::info!(path = %path.display(), "[Config] Settings loaded"),
        None => tracing::info!("[Config] Using default settings"),
    }
    if let Err(err) = app::run(&cli, &settings).await {
        tracing::error!(error = ?err, "Application error");
        eprintln!("storefront: {err}");
        std::process::exit(1);
    }
    tracing::info!("Storefront exited");
}
