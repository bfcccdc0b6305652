//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the access/relay configuration

use anyhow::Result;
use simplelog::*;
use std::fs::OpenOptions;

use crate::core::config::{RelaySettings, TokenSettings};

/// Initialize logger for both console and file output
///
/// The log file is opened in append mode so restarts keep the previous history.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `level` - Maximum level written to both outputs
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    log::debug!("Logging at level {}", level);
    Ok(())
}

/// Logs the effective token and relay configuration at startup
pub fn log_startup_configuration(tokens: &TokenSettings, relay: &RelaySettings, admins: &[i64], shortener: bool) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🔐 Access configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Token validity: {}s", tokens.validity.num_seconds());
    log::info!("Deep-link domain: {}", tokens.bot_domain);
    log::info!("Archive channel: {}", relay.channel_id);
    log::info!(
        "Relay: protect_content={}, max_messages={}",
        relay.protect_content,
        relay.max_messages
    );
    if admins.is_empty() {
        log::warn!("⚠️  ADMINS is empty - /users, /broadcast, /deleteall and /genlink are disabled");
    } else {
        log::info!("Admins: {:?}", admins);
    }
    if shortener {
        log::info!("✅ Link shortener enabled");
    } else {
        log::info!("Link shortener disabled (SHORTENER_API_URL / SHORTENER_API_KEY unset)");
    }
}
