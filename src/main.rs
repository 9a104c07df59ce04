mod app;
mod model;
mod nav;
mod services;
mod theme;
mod typeahead;
mod ui;
mod widgets;

use anyhow::{Context, Result};
use std::sync::Mutex;

fn main() -> Result<()> {
    init_tracing()?;
    ui::run()
}

// The terminal belongs to the UI, so logs only go to a file when
// TYPEAHEAD_TUI_LOG names one.
fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("TYPEAHEAD_TUI_LOG") else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {path}"))?;
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
