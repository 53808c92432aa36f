//! Structured logging to a file; the terminal belongs to the renderer.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::LogError;

/// `RUST_LOG` when set, otherwise the configured directive.
pub fn filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.filter).map_err(|e| LogError::Filter {
            filter: config.filter.clone(),
            reason: e.to_string(),
        })
    })
}

/// Installs the global subscriber, truncating the log file.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let filter = filter(config)?;
    let file = File::create(&config.file).map_err(|source| LogError::Open {
        path: config.file.clone(),
        source,
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::Install(e.to_string()))
}
