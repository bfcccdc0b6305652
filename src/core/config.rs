use chrono::TimeDelta;
use log::LevelFilter;
use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::time::Duration;
use url::Url;

use crate::core::error::ConfigError;

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: linkvault.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "linkvault.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: linkvault.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "linkvault.log".to_string()));

/// Log verbosity for console and file output
/// Read from LOG_LEVEL environment variable (off, error, warn, info, debug, trace)
/// Default: info
pub static LOG_LEVEL: Lazy<LevelFilter> =
    Lazy::new(|| parse_log_level(env::var("LOG_LEVEL").ok().as_deref()));

/// Unset, blank or unrecognised values fall back to `Info`
pub fn parse_log_level(value: Option<&str>) -> LevelFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server, if any
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| non_empty_var("BOT_API_URL"));

/// Private archive channel the relayed messages are copied from
/// Read from CHANNEL_ID environment variable (e.g. -1001234567890)
pub static CHANNEL_ID: Lazy<i64> =
    Lazy::new(|| env::var("CHANNEL_ID").ok().and_then(|s| s.trim().parse().ok()).unwrap_or(0));

/// Welcome text shown to users with a valid token and no request.
/// `{first}` and `{id}` are replaced with the user's first name and id.
pub static START_MESSAGE: Lazy<String> = Lazy::new(|| {
    env::var("START_MESSAGE").unwrap_or_else(|_| {
        "Hello {first}!\n\nI can store private files in a specified channel and other users can access them from a special link."
            .to_string()
    })
});

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn bool_var(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Access token configuration
pub mod token {
    use once_cell::sync::Lazy;
    use std::env;

    /// Default token lifetime: one day
    pub const DEFAULT_VALIDITY_SECS: i64 = 24 * 60 * 60;

    /// Token lifetime in seconds
    /// Read from TOKEN_VALIDITY_SECS environment variable
    pub static VALIDITY_SECS: Lazy<i64> = Lazy::new(|| {
        env::var("TOKEN_VALIDITY_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_VALIDITY_SECS)
    });

    /// Domain used when building deep links
    /// Read from BOT_DOMAIN environment variable
    pub static BOT_DOMAIN: Lazy<String> =
        Lazy::new(|| super::non_empty_var("BOT_DOMAIN").unwrap_or_else(|| "t.me".to_string()));
}

/// Relay configuration
pub mod relay {
    use once_cell::sync::Lazy;
    use std::env;

    /// Upper bound on messages copied for a single range request
    pub const DEFAULT_MAX_MESSAGES: usize = 200;

    /// Read from MAX_RELAY_MESSAGES environment variable
    pub static MAX_MESSAGES: Lazy<usize> = Lazy::new(|| {
        env::var("MAX_RELAY_MESSAGES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_MESSAGES)
    });

    /// Forbid forwarding/saving of relayed copies
    /// Read from PROTECT_CONTENT environment variable
    pub static PROTECT_CONTENT: Lazy<bool> = Lazy::new(|| super::bool_var("PROTECT_CONTENT"));
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(crate) fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMINS environment variable
    pub static ADMINS: Lazy<Vec<i64>> =
        Lazy::new(|| env::var("ADMINS").ok().map(|raw| parse_admin_ids(&raw)).unwrap_or_default());
}

/// Link shortener configuration
pub mod shortener {
    use once_cell::sync::Lazy;

    /// Shortener API endpoint, e.g. `https://short.example/api`
    pub static API_URL: Lazy<Option<String>> = Lazy::new(|| super::non_empty_var("SHORTENER_API_URL"));

    /// Shortener API key
    pub static API_KEY: Lazy<Option<String>> = Lazy::new(|| super::non_empty_var("SHORTENER_API_KEY"));
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout for the link shortener (in seconds)
    pub const SHORTENER_TIMEOUT_SECS: u64 = 10;

    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    pub fn shortener_timeout() -> Duration {
        Duration::from_secs(SHORTENER_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Attempts to reach the Bot API on startup before giving up
    pub const STARTUP_MAX_RETRIES: u32 = 12;

    /// Delay between startup attempts (in seconds)
    pub const STARTUP_RETRY_DELAY_SECS: u64 = 5;

    pub fn startup_delay() -> Duration {
        Duration::from_secs(STARTUP_RETRY_DELAY_SECS)
    }
}

/// Token issuance settings injected into the issuer and the gate.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub validity: TimeDelta,
    pub bot_domain: String,
}

impl TokenSettings {
    /// Builds settings from a validity period in seconds.
    ///
    /// The period must be strictly positive so that `expires_at > issued_at` always holds.
    pub fn new(validity_secs: i64, bot_domain: impl Into<String>) -> Result<Self, ConfigError> {
        let validity = TimeDelta::try_seconds(validity_secs)
            .filter(|_| validity_secs > 0)
            .ok_or(ConfigError::InvalidValidity {
                name: "TOKEN_VALIDITY_SECS",
                value: validity_secs,
            })?;
        Ok(Self {
            validity,
            bot_domain: bot_domain.into(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(*token::VALIDITY_SECS, token::BOT_DOMAIN.as_str())
    }
}

/// Where relayed messages come from and how they are copied.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub channel_id: i64,
    pub protect_content: bool,
    pub max_messages: usize,
}

impl RelaySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        if *CHANNEL_ID == 0 {
            return Err(ConfigError::Missing { name: "CHANNEL_ID" });
        }
        Ok(Self {
            channel_id: *CHANNEL_ID,
            protect_content: *relay::PROTECT_CONTENT,
            max_messages: *relay::MAX_MESSAGES,
        })
    }
}

/// Link shortener endpoint and credentials.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    pub api_url: Url,
    pub api_key: SecretString,
}

impl ShortenerSettings {
    /// Returns `Ok(None)` when shortening is not configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(raw_url), Some(key)) = (shortener::API_URL.as_ref(), shortener::API_KEY.as_ref()) else {
            return Ok(None);
        };
        let api_url = Url::parse(raw_url).map_err(|_| ConfigError::InvalidUrl {
            name: "SHORTENER_API_URL",
            value: raw_url.clone(),
        })?;
        Ok(Some(Self {
            api_url,
            api_key: SecretString::from(key.clone()),
        }))
    }
}
