//! Logging setup.
//!
//! The terminal belongs to the UI, so events go to a file.  The filter comes
//! from `RUST_LOG`, then `LIVESCROLL_NEWS_LOG`, then a crate-level default.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "LIVESCROLL_NEWS_LOG";

fn default_directive() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

fn filter() -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| default_directive());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(default_directive()))
}

pub fn init(log_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(log_path)?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter());

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_names_this_crate() {
        assert_eq!(default_directive(), "livescroll_news=info");
    }

    #[test]
    fn init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("news.log");

        init(&path).unwrap();
        tracing::info!("hello from the test");

        assert!(path.exists());
    }
}
