//! Admin commands: /users, /broadcast, /deleteall and /genlink.
//!
//! Non-admins get a refusal and nothing else happens.

use crate::access::payload::{ContentRequest, StartPayload};
use crate::telegram::handlers::{HandlerDeps, HandlerError, FAILURE_TEXT};
use crate::telegram::relay::broadcast;
use crate::telegram::transport::{reply, LinkButton, Transport};

const NOT_ALLOWED: &str = "You are not allowed to use this command.";
const BROADCAST_USAGE: &str = "Use this command as a reply to the message you want to broadcast.";
const GENLINK_USAGE: &str = "Usage: /genlink <message id> or /genlink <first id> <last id>";

/// Parses `/genlink` arguments: one message id or an inclusive pair.
pub fn parse_genlink_args(args: &str) -> Option<ContentRequest> {
    let ids: Vec<i32> = args
        .split_whitespace()
        .map(|part| part.parse::<i32>().ok().filter(|id| *id > 0))
        .collect::<Option<_>>()?;

    match ids.as_slice() {
        [id] => Some(ContentRequest::Single(*id)),
        [start, end] => Some(ContentRequest::Range {
            start: *start,
            end: *end,
        }),
        _ => None,
    }
}

async fn refuse(transport: &dyn Transport, user_id: i64, command: &str) -> Result<(), HandlerError> {
    log::warn!("User {} tried to use /{} without permission", user_id, command);
    reply(transport, user_id, NOT_ALLOWED, None).await?;
    Ok(())
}

async fn report_failure(
    transport: &dyn Transport,
    user_id: i64,
    command: &str,
    err: impl std::fmt::Display,
) -> Result<(), HandlerError> {
    log::error!("Admin command /{} from user {} failed: {}", command, user_id, err);
    reply(transport, user_id, FAILURE_TEXT, None).await?;
    Ok(())
}

pub async fn handle_users_command(transport: &dyn Transport, deps: &HandlerDeps, user_id: i64) -> Result<(), HandlerError> {
    if !deps.is_admin(user_id) {
        return refuse(transport, user_id, "users").await;
    }

    let count = match deps.users.count_users().await {
        Ok(count) => count,
        Err(e) => return report_failure(transport, user_id, "users", e).await,
    };
    reply(transport, user_id, &format!("{} users are using this bot", count), None).await?;
    Ok(())
}

/// Copies the replied-to message to every user and reports the counters back.
pub async fn handle_broadcast_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user_id: i64,
    reply_to: Option<i32>,
) -> Result<(), HandlerError> {
    if !deps.is_admin(user_id) {
        return refuse(transport, user_id, "broadcast").await;
    }
    let Some(message_id) = reply_to else {
        reply(transport, user_id, BROADCAST_USAGE, None).await?;
        return Ok(());
    };

    reply(transport, user_id, "Broadcasting message, this will take some time...", None).await?;
    let report = match broadcast(transport, deps.users.as_ref(), user_id, message_id).await {
        Ok(report) => report,
        Err(e) => return report_failure(transport, user_id, "broadcast", e).await,
    };
    reply(transport, user_id, &report.render(), None).await?;
    Ok(())
}

/// Wipes every token and user record.
pub async fn handle_deleteall_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user_id: i64,
) -> Result<(), HandlerError> {
    if !deps.is_admin(user_id) {
        return refuse(transport, user_id, "deleteall").await;
    }

    let tokens = match deps.tokens.delete_all_tokens().await {
        Ok(tokens) => tokens,
        Err(e) => return report_failure(transport, user_id, "deleteall", e).await,
    };
    let users = match deps.users.delete_all_users().await {
        Ok(users) => users,
        Err(e) => return report_failure(transport, user_id, "deleteall", e).await,
    };
    log::warn!("Admin {} wiped {} tokens and {} users", user_id, tokens, users);

    reply(
        transport,
        user_id,
        &format!("Deleted {} access tokens and {} users.", tokens, users),
        None,
    )
    .await?;
    Ok(())
}

pub async fn handle_genlink_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user_id: i64,
    args: &str,
) -> Result<(), HandlerError> {
    if !deps.is_admin(user_id) {
        return refuse(transport, user_id, "genlink").await;
    }
    let Some(request) = parse_genlink_args(args) else {
        reply(transport, user_id, GENLINK_USAGE, None).await?;
        return Ok(());
    };

    let link = deps.gate.links().raw(&StartPayload::Content(request));
    reply(
        transport,
        user_id,
        &format!("Here is your link:\n{}", link),
        Some(LinkButton::new("Share URL", link.clone())),
    )
    .await?;
    Ok(())
}
