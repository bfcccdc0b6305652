//! Command handlers for /start and /check

use chrono::{DateTime, Utc};

use super::types::{HandlerDeps, HandlerError, UserInfo};
use crate::access::gate::{GateOutcome, IssueReason};
use crate::access::verifier::{AccessStatus, VerificationResult};
use crate::telegram::relay::relay_content;
use crate::telegram::transport::{reply, LinkButton, Transport};

pub const FAILURE_TEXT: &str = "Something went wrong, please try again later.";
const ACTIVATE_LABEL: &str = "Activate access";

fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Fills the sender placeholders in the configured welcome text.
///
/// `{first}`, `{last}`, `{username}` (with a leading `@`), `{mention}` and `{id}`. Missing
/// optional names render as an empty string; `{mention}` falls back to the first name.
pub fn render_start_message(template: &str, user: &UserInfo) -> String {
    let username = user.username.as_deref().map(|name| format!("@{}", name));
    let mention = username.clone().unwrap_or_else(|| user.first_name.clone());
    template
        .replace("{first}", &user.first_name)
        .replace("{last}", user.last_name.as_deref().unwrap_or(""))
        .replace("{username}", username.as_deref().unwrap_or(""))
        .replace("{mention}", &mention)
        .replace("{id}", &user.user_id.to_string())
}

fn link_intro(reason: IssueReason) -> &'static str {
    match reason {
        IssueReason::FirstToken => "Your access token has been generated. Open the link below to activate it.",
        IssueReason::Expired => "Your access token has expired. Open the link below to renew your access.",
        IssueReason::Pending => "You still have an unused access link. Open it to activate your access.",
        IssueReason::Rejected(VerificationResult::Expired) => "That access link has expired. Use the fresh link below.",
        IssueReason::Rejected(_) => "That access link is not valid. Use the fresh link below.",
    }
}

/// Text and optional button for a gate outcome. `None` for relay requests, which answer
/// with the content itself.
pub fn outcome_reply(outcome: &GateOutcome, user: &UserInfo, start_message: &str) -> Option<(String, Option<LinkButton>)> {
    match outcome {
        GateOutcome::Welcome => Some((render_start_message(start_message, user), None)),
        GateOutcome::LinkIssued {
            link,
            expires_at,
            reason,
        } => Some((
            format!("{}\n\nValid until {}.", link_intro(*reason), format_time(expires_at)),
            Some(LinkButton::new(ACTIVATE_LABEL, link.clone())),
        )),
        GateOutcome::Verified { expires_at } => Some((
            format!("Access granted until {}. You can now open file links.", format_time(expires_at)),
            None,
        )),
        GateOutcome::Relay(_) => None,
    }
}

pub fn status_text(status: &AccessStatus) -> String {
    match status {
        AccessStatus::NoToken => "You have no access token yet. Send /start to get one.".to_string(),
        AccessStatus::Pending { expires_at, .. } => format!(
            "Your access link has not been opened yet. It is valid until {}.",
            format_time(expires_at)
        ),
        AccessStatus::Valid { expires_at } => format!("Your access is active until {}.", format_time(expires_at)),
        AccessStatus::Expired { expired_at } => format!(
            "Your access expired at {}. Send /start to renew it.",
            format_time(expired_at)
        ),
    }
}

/// Handles /start [param]
pub async fn handle_start_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user: &UserInfo,
    param: &str,
) -> Result<(), HandlerError> {
    let outcome = match deps.gate.handle_start(user.user_id, Some(param)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Failed to handle /start for user {}: {}", user.user_id, e);
            reply(transport, user.user_id, FAILURE_TEXT, None).await?;
            return Ok(());
        }
    };

    if let GateOutcome::Relay(request) = &outcome {
        match relay_content(transport, deps.users.as_ref(), &deps.relay, user.user_id, request).await {
            Ok(report) if report.delivered == 0 && !report.user_removed => {
                reply(transport, user.user_id, "Those files are not available.", None).await?;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to relay {:?} to user {}: {}", request, user.user_id, e);
                reply(transport, user.user_id, FAILURE_TEXT, None).await?;
            }
        }
        return Ok(());
    }

    if let Some((text, button)) = outcome_reply(&outcome, user, &deps.start_message) {
        reply(transport, user.user_id, &text, button).await?;
    }
    Ok(())
}

/// Handles /check
pub async fn handle_check_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user: &UserInfo,
) -> Result<(), HandlerError> {
    let text = match deps.gate.check(user.user_id).await {
        Ok(status) => status_text(&status),
        Err(e) => {
            log::error!("Failed to read token status for user {}: {}", user.user_id, e);
            FAILURE_TEXT.to_string()
        }
    };
    reply(transport, user.user_id, &text, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> UserInfo {
        UserInfo::new(42, "Ada")
    }

    #[test]
    fn test_render_start_message_placeholders() {
        assert_eq!(render_start_message("Hi {first} ({id})", &user()), "Hi Ada (42)");
        assert_eq!(render_start_message("Hello", &user()), "Hello");
    }

    #[test]
    fn test_render_start_message_optional_names() {
        let full = user().with_last_name("Lovelace").with_username("ada_l");
        assert_eq!(
            render_start_message("{first} {last} {username} {mention}", &full),
            "Ada Lovelace @ada_l @ada_l"
        );
        assert_eq!(render_start_message("[{last}][{username}] {mention}", &user()), "[][] Ada");
    }

    #[test]
    fn test_link_issued_reply_has_button() {
        let expires_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let outcome = GateOutcome::LinkIssued {
            link: "https://t.me/vault_bot?start=abc".to_string(),
            expires_at,
            reason: IssueReason::FirstToken,
        };

        let (text, button) = outcome_reply(&outcome, &user(), "").unwrap();
        assert!(text.contains("2026-01-02 03:04 UTC"));
        assert_eq!(button.unwrap().url, "https://t.me/vault_bot?start=abc");
    }

    #[test]
    fn test_relay_outcome_has_no_text_reply() {
        let outcome = GateOutcome::Relay(crate::access::payload::ContentRequest::Single(1));
        assert!(outcome_reply(&outcome, &user(), "").is_none());
    }

    #[test]
    fn test_status_text_mentions_renewal_when_expired() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(status_text(&AccessStatus::Expired { expired_at: at }).contains("/start"));
        assert!(status_text(&AccessStatus::NoToken).contains("/start"));
    }
}
