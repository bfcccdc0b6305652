//! Copying archived messages to users, one at a time.
//!
//! Flood control is honoured with a single retry. Users that blocked the bot or deleted
//! their account are removed from the user list as soon as the transport reports it.

use crate::access::payload::ContentRequest;
use crate::core::config::RelaySettings;
use crate::core::error::StoreResult;
use crate::core::retry::retry_once_after_hint;
use crate::storage::users::UserStore;
use crate::telegram::transport::{CopyOptions, Transport, TransportError};

/// How a content request went for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub delivered: usize,
    pub failed: usize,
    /// The user turned out to be unreachable and was deleted; relaying stopped
    pub user_removed: bool,
}

/// Per-outcome counters of a broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub total: usize,
    pub successful: usize,
    pub blocked: usize,
    pub deleted: usize,
    pub unsuccessful: usize,
}

impl BroadcastReport {
    pub fn render(&self) -> String {
        format!(
            "Broadcast completed\n\n\
            Total users: {}\n\
            Successful: {}\n\
            Blocked users: {}\n\
            Deleted accounts: {}\n\
            Unsuccessful: {}",
            self.total, self.successful, self.blocked, self.deleted, self.unsuccessful
        )
    }
}

async fn forget_user(users: &dyn UserStore, user_id: i64, reason: &TransportError) -> StoreResult<()> {
    if users.delete_user(user_id).await? {
        log::info!("Removed user {} ({})", user_id, reason);
    }
    Ok(())
}

/// Copies the requested archive messages to `user_id` in order.
pub async fn relay_content(
    transport: &dyn Transport,
    users: &dyn UserStore,
    settings: &RelaySettings,
    user_id: i64,
    request: &ContentRequest,
) -> StoreResult<RelayReport> {
    let options = CopyOptions {
        protect_content: settings.protect_content,
    };
    let mut report = RelayReport::default();

    for message_id in request.message_ids(settings.max_messages) {
        let outcome =
            retry_once_after_hint(|| transport.copy_message(settings.channel_id, message_id, user_id, options)).await;

        match outcome.result {
            Ok(()) => report.delivered += 1,
            Err(e) if e.is_unreachable_user() => {
                forget_user(users, user_id, &e).await?;
                report.user_removed = true;
                break;
            }
            Err(e) => {
                log::warn!(
                    "Failed to relay message {} to user {} after {} attempt(s): {}",
                    message_id,
                    user_id,
                    outcome.attempts,
                    e
                );
                report.failed += 1;
            }
        }
    }

    log::info!(
        "Relayed {:?} to user {}: {} delivered, {} failed",
        request,
        user_id,
        report.delivered,
        report.failed
    );
    Ok(report)
}

/// Copies one message to every registered user.
pub async fn broadcast(
    transport: &dyn Transport,
    users: &dyn UserStore,
    from_chat: i64,
    message_id: i32,
) -> StoreResult<BroadcastReport> {
    let recipients = users.all_user_ids().await?;
    let mut report = BroadcastReport::default();
    log::info!("Broadcasting message {} to {} users", message_id, recipients.len());

    for user_id in recipients {
        let outcome = retry_once_after_hint(|| {
            transport.copy_message(from_chat, message_id, user_id, CopyOptions::default())
        })
        .await;

        match outcome.result {
            Ok(()) => report.successful += 1,
            Err(e @ TransportError::UserBlocked) => {
                forget_user(users, user_id, &e).await?;
                report.blocked += 1;
            }
            Err(e @ TransportError::UserDeactivated) => {
                forget_user(users, user_id, &e).await?;
                report.deleted += 1;
            }
            Err(e) => {
                log::warn!("Broadcast to user {} failed: {}", user_id, e);
                report.unsuccessful += 1;
            }
        }
        report.total += 1;
    }

    log::info!("{:?}", report);
    Ok(report)
}
