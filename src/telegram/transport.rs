//! Outbound messaging seam.
//!
//! Everything the bot sends goes through [`Transport`] so delivery failure handling can be
//! exercised without the Bot API.

use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use teloxide::{ApiError, RequestError};
use thiserror::Error;
use url::Url;

use crate::core::retry::{retry_once_after_hint, Retryable};

/// A single inline URL button attached under a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

impl LinkButton {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Forbid forwarding and saving of the copy
    pub protect_content: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("rate limited, retry after {0:?}")]
    RateLimited(Duration),

    #[error("user blocked the bot")]
    UserBlocked,

    #[error("user account is deactivated")]
    UserDeactivated,

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// True when the user can never be reached again and should be forgotten.
    pub fn is_unreachable_user(&self) -> bool {
        matches!(self, TransportError::UserBlocked | TransportError::UserDeactivated)
    }
}

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RetryAfter(seconds) => TransportError::RateLimited(seconds.duration()),
            RequestError::Api(ApiError::BotBlocked) => TransportError::UserBlocked,
            RequestError::Api(ApiError::UserDeactivated) => TransportError::UserDeactivated,
            other => TransportError::Other(other.to_string()),
        }
    }
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        matches!(self, TransportError::RateLimited(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            TransportError::RateLimited(delay) => Some(*delay),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, user_id: i64, text: &str, button: Option<LinkButton>) -> Result<(), TransportError>;

    async fn copy_message(
        &self,
        from_chat: i64,
        message_id: i32,
        to_user: i64,
        options: CopyOptions,
    ) -> Result<(), TransportError>;
}

/// Sends a text reply, retrying once when flood control asks us to wait.
pub async fn reply(
    transport: &dyn Transport,
    user_id: i64,
    text: &str,
    button: Option<LinkButton>,
) -> Result<(), TransportError> {
    retry_once_after_hint(|| transport.send_message(user_id, text, button.clone()))
        .await
        .result
}

#[async_trait]
impl Transport for Bot {
    async fn send_message(&self, user_id: i64, text: &str, button: Option<LinkButton>) -> Result<(), TransportError> {
        let request = Requester::send_message(self, ChatId(user_id), text);
        match button {
            Some(button) => {
                let url = Url::parse(&button.url)
                    .map_err(|e| TransportError::Other(format!("invalid button url {}: {}", button.url, e)))?;
                let markup = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(button.label, url)]]);
                request.reply_markup(markup).await?;
            }
            None => {
                request.await?;
            }
        }
        Ok(())
    }

    async fn copy_message(
        &self,
        from_chat: i64,
        message_id: i32,
        to_user: i64,
        options: CopyOptions,
    ) -> Result<(), TransportError> {
        Requester::copy_message(self, ChatId(to_user), ChatId(from_chat), MessageId(message_id))
            .protect_content(options.protect_content)
            .await?;
        Ok(())
    }
}
