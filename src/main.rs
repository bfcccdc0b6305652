use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use linkvault::access::{
    decode, encode, AccessGate, LinkBuilder, LinkShortener, StartPayload, TokenIssuer, TokenVerifier,
};
use linkvault::cli::{Cli, Commands};
use linkvault::core::config::{self, RelaySettings, ShortenerSettings, TokenSettings};
use linkvault::core::retry::Retryable;
use linkvault::core::{init_logger, log_startup_configuration, Clock, SystemClock};
use linkvault::storage::{SqliteStore, TokenStore, UserStore};
use linkvault::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand; without one the bot runs.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config static is read
    let _ = dotenv();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
    }));

    init_logger(&config::LOG_FILE_PATH, *config::LOG_LEVEL)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Issue { user_id, bot_username }) => run_issue(user_id, &bot_username).await,
        Some(Commands::Reset { yes }) => run_reset(yes).await,
        Some(Commands::Encode { payload }) => {
            println!("{}", encode(&payload));
            Ok(())
        }
        Some(Commands::Decode { param }) => {
            let decoded = decode(&param).with_context(|| format!("Cannot decode {:?}", param))?;
            match decoded.parse::<StartPayload>() {
                Ok(payload) => println!("{} ({:?})", decoded, payload),
                Err(_) => println!("{}", decoded),
            }
            Ok(())
        }
    }
}

fn open_store() -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config::DATABASE_PATH)
        .with_context(|| format!("Failed to open database {}", config::DATABASE_PATH.as_str()))?;
    Ok(Arc::new(store))
}

fn link_builder(tokens: &TokenSettings, bot_username: &str) -> Result<LinkBuilder> {
    let shortener = ShortenerSettings::from_env()?
        .map(LinkShortener::new)
        .transpose()?
        .map(Arc::new);
    Ok(LinkBuilder::new(tokens.bot_domain.clone(), bot_username, shortener))
}

/// Issue a token from the shell
async fn run_issue(user_id: i64, bot_username: &str) -> Result<()> {
    let settings = TokenSettings::from_env()?;
    let store = open_store()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    store.add_user(user_id, clock.now()).await?;
    let issuer = TokenIssuer::new(store, clock, settings.validity);
    let record = issuer.issue(user_id).await?;
    let link = link_builder(&settings, bot_username)?.token_link(&record.token).await;

    println!("user:    {}", user_id);
    println!("token:   {}", record.token);
    println!("expires: {}", record.expires_at.to_rfc3339());
    println!("link:    {}", link);
    Ok(())
}

/// Administrative wipe of tokens and users
async fn run_reset(yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to wipe {} without --yes", config::DATABASE_PATH.as_str());
    }
    let store = open_store()?;
    let tokens = store.delete_all_tokens().await?;
    let users = store.delete_all_users().await?;
    log::warn!("Reset removed {} tokens and {} users", tokens, users);
    println!("Deleted {} access tokens and {} users", tokens, users);
    Ok(())
}

/// Runs the bot with long polling until Ctrl-C
async fn run_bot() -> Result<()> {
    let token_settings = TokenSettings::from_env()?;
    let relay_settings = RelaySettings::from_env()?;
    let admins = config::admin::ADMINS.clone();

    let store = open_store()?;
    let bot = create_bot()?;

    // The Bot API may still be starting (local server); wait for it
    let me = {
        let mut attempt = 0;
        loop {
            match bot.get_me().await {
                Ok(me) => break me,
                Err(e) => {
                    attempt += 1;
                    if attempt >= config::retry::STARTUP_MAX_RETRIES || !e.is_retryable() {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} attempts: {}",
                            attempt,
                            e
                        ));
                    }
                    let delay = e.retry_after().unwrap_or_else(config::retry::startup_delay);
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt,
                        config::retry::STARTUP_MAX_RETRIES,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    };
    let bot_username = me.username.clone().context("Bot account has no username")?;
    log::info!("Bot username: @{}, Bot ID: {}", bot_username, me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let links = link_builder(&token_settings, &bot_username)?;
    log_startup_configuration(&token_settings, &relay_settings, &admins, links.has_shortener());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tokens: Arc<dyn TokenStore> = store.clone();
    let users: Arc<dyn UserStore> = store;
    let gate = AccessGate::new(
        users.clone(),
        TokenIssuer::new(tokens.clone(), clock.clone(), token_settings.validity),
        TokenVerifier::new(tokens.clone(), clock.clone()),
        Arc::new(links),
        clock,
    );
    let deps = HandlerDeps::new(gate, tokens, users, relay_settings, admins, config::START_MESSAGE.clone());

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    log::info!("Starting dispatcher");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
