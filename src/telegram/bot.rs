//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command menu registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppResult, ConfigError};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "open a link or get your access link")]
    Start(String),
    #[command(description = "show your access token status")]
    Check,
    #[command(description = "count registered users (admins only)")]
    Users,
    #[command(description = "reply to a message to send it to every user (admins only)")]
    Broadcast,
    #[command(description = "wipe all users and tokens (admins only)")]
    Deleteall,
    #[command(description = "make a link for <id> or <first> <last> archive messages (admins only)")]
    Genlink(String),
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError)` - Missing token, invalid BOT_API_URL or HTTP client failure
pub fn create_bot() -> AppResult<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(ConfigError::Missing { name: "BOT_TOKEN" }.into());
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    match config::BOT_API_URL.as_deref() {
        Some(raw) => {
            log::info!("Using custom Bot API URL: {}", raw);
            let url = url::Url::parse(raw).map_err(|_| ConfigError::InvalidUrl {
                name: "BOT_API_URL",
                value: raw.to_string(),
            })?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Sets up the public command menu. Admin commands stay hidden.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "open a link or get your access link"),
        BotCommand::new("check", "show your access token status"),
    ])
    .await?;

    Ok(())
}
