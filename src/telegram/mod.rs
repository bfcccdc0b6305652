//! Telegram bot integration and handlers

pub mod admin;
pub mod bot;
pub mod handlers;
pub mod relay;
pub mod transport;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError, UserInfo};
pub use relay::{broadcast, relay_content, BroadcastReport, RelayReport};
pub use transport::{reply, CopyOptions, LinkButton, Transport, TransportError};
