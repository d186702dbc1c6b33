//! Tracing setup.
//!
//! The terminal belongs to the TUI, so events go to `<data_dir>/citedr.log`.
//! `CITEDR_LOG` controls the filter (e.g. "debug" or "info,citedr::session=debug").

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "citedr.log";

pub fn init_tracing(data_dir: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_env("CITEDR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;
    Ok(())
}
