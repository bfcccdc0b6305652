//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::Message;

use crate::access::gate::AccessGate;
use crate::core::config::RelaySettings;
use crate::storage::tokens::TokenStore;
use crate::storage::users::UserStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub gate: AccessGate,
    pub tokens: Arc<dyn TokenStore>,
    pub users: Arc<dyn UserStore>,
    pub relay: RelaySettings,
    pub admins: Arc<Vec<i64>>,
    pub start_message: String,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        gate: AccessGate,
        tokens: Arc<dyn TokenStore>,
        users: Arc<dyn UserStore>,
        relay: RelaySettings,
        admins: Vec<i64>,
        start_message: String,
    ) -> Self {
        Self {
            gate,
            tokens,
            users,
            relay,
            admins: Arc::new(admins),
            start_message,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }
}

/// The sender of a private message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Without the leading `@`
    pub username: Option<String>,
}

impl UserInfo {
    pub fn new(user_id: i64, first_name: impl Into<String>) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            last_name: None,
            username: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Extract the sender from a Telegram message; `None` for channel posts and ids out of range
    pub fn from_message(msg: &Message) -> Option<Self> {
        let from = msg.from.as_ref()?;
        let user_id = i64::try_from(from.id.0).ok()?;
        Some(Self {
            user_id,
            first_name: from.first_name.clone(),
            last_name: from.last_name.clone(),
            username: from.username.clone(),
        })
    }
}
