use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::LevelFilter, fmt, Layer, Registry};

/// Install a file-only subscriber. The terminal belongs to the TUI, so nothing
/// is written to stdout or stderr.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;

    let file_layer = fmt::layer()
        .with_writer(rolling::daily(log_dir, "book-library.log"))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    Registry::default()
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")
}
