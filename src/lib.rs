//! linkvault - Telegram file-sharing bot with time-limited access tokens
//!
//! Users open deep links whose `start` parameter is URL-safe base64. A link either carries an
//! access token (issued per user, valid for a configured period) or a reference to messages in
//! a private archive channel, which are copied to users holding a valid token.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, clock and retry helpers
//! - `storage`: SQLite token and user stores
//! - `access`: token issuing and verification, deep links, the `/start` gate
//! - `telegram`: transport seam, relay/broadcast and the dispatcher schema
//! - `cli`: command line interface

pub mod access;
pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use access::{AccessGate, GateOutcome, LinkBuilder, TokenIssuer, TokenVerifier, VerificationResult};
pub use crate::core::config;
pub use storage::{create_pool, get_connection, DbConnection, DbPool, SqliteStore};
