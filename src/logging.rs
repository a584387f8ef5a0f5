//! File-based tracing setup.
//!
//! The terminal belongs to the TUI, so log output goes to a file instead.
//! Levels come from `INVENTORY_CHAT_LOG` (e.g. `INVENTORY_CHAT_LOG=inventory_chat=debug`),
//! falling back to `inventory_chat=info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INVENTORY_CHAT_LOG";

static INIT: Once = Once::new();

pub fn default_log_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?;

    Ok(cache_dir.join("inventory-chat").join("inventory-chat.log"))
}

/// Initialize logging to `path`. Only the first call has any effect.
pub fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("inventory_chat=info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    });

    Ok(())
}
