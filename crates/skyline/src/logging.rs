//! Tracing setup.
//!
//! The terminal belongs to the TUI, so logs go to a file in the local data
//! directory. `SKYLINE_LOG` overrides the configured filter.

use std::fs::{self, File};
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use skyline_config::Config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a log filter.
const LOG_ENV: &str = "SKYLINE_LOG";

/// Install the global subscriber.
pub fn init(config: &Config) -> color_eyre::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = Config::log_path() else {
        // Nowhere to write; keep the macros cheap
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::sink))
            .with(filter)
            .try_init()
            .map_err(|e| eyre!("installing tracing subscriber: {e}"))?;
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init()
        .map_err(|e| eyre!("installing tracing subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
