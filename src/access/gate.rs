//! The `/start` state machine.
//!
//! A user moves from unregistered to registered on first contact, then cycles through
//! no token → pending → valid → expired. Expiry is evaluated lazily on each read.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::issuer::TokenIssuer;
use super::link::LinkBuilder;
use super::payload::{ContentRequest, StartPayload};
use super::verifier::{AccessStatus, TokenVerifier, VerificationResult};
use crate::core::clock::Clock;
use crate::core::error::StoreResult;
use crate::storage::users::UserStore;

/// Why a link was handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueReason {
    FirstToken,
    Expired,
    /// A presented token did not verify
    Rejected(VerificationResult),
    /// Re-presenting the link of a still-pending token; nothing was issued
    Pending,
}

/// What the Telegram layer should tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Welcome,
    LinkIssued {
        link: String,
        expires_at: DateTime<Utc>,
        reason: IssueReason,
    },
    Verified {
        expires_at: DateTime<Utc>,
    },
    Relay(ContentRequest),
}

#[derive(Clone)]
pub struct AccessGate {
    users: Arc<dyn UserStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    links: Arc<LinkBuilder>,
    clock: Arc<dyn Clock>,
}

impl AccessGate {
    pub fn new(
        users: Arc<dyn UserStore>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        links: Arc<LinkBuilder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            issuer,
            verifier,
            links,
            clock,
        }
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Handles `/start` with an optional raw deep-link parameter.
    pub async fn handle_start(&self, user_id: i64, param: Option<&str>) -> StoreResult<GateOutcome> {
        if self.users.add_user(user_id, self.clock.now()).await? {
            log::info!("Registered new user {}", user_id);
        }

        let payload = param
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| match StartPayload::from_param(p) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    log::debug!("Ignoring malformed start parameter from user {}: {}", user_id, e);
                    None
                }
            });

        match payload {
            Some(StartPayload::Token(presented)) => self.present_token(user_id, &presented).await,
            Some(StartPayload::Content(request)) => self.without_token(user_id, Some(request)).await,
            None => self.without_token(user_id, None).await,
        }
    }

    /// Read-only view of the user's access, for `/check`.
    pub async fn check(&self, user_id: i64) -> StoreResult<AccessStatus> {
        self.verifier.status(user_id).await
    }

    async fn present_token(&self, user_id: i64, presented: &str) -> StoreResult<GateOutcome> {
        let verification = self.verifier.check(user_id, presented).await?;
        match (verification.result, verification.record) {
            (VerificationResult::Valid, Some(record)) => {
                log::info!("User {} verified access token", user_id);
                Ok(GateOutcome::Verified {
                    expires_at: record.expires_at,
                })
            }
            (result, _) => {
                log::info!("User {} presented a token that failed verification: {:?}", user_id, result);
                // A stale link must not revoke access the user already holds
                if let AccessStatus::Valid { .. } = self.verifier.status(user_id).await? {
                    return Ok(GateOutcome::Welcome);
                }
                self.issue_link(user_id, IssueReason::Rejected(result)).await
            }
        }
    }

    async fn without_token(&self, user_id: i64, request: Option<ContentRequest>) -> StoreResult<GateOutcome> {
        match self.verifier.status(user_id).await? {
            AccessStatus::Valid { .. } => Ok(request.map_or(GateOutcome::Welcome, GateOutcome::Relay)),
            AccessStatus::Pending { token, expires_at } => Ok(GateOutcome::LinkIssued {
                link: self.links.token_link(&token).await,
                expires_at,
                reason: IssueReason::Pending,
            }),
            AccessStatus::NoToken => self.issue_link(user_id, IssueReason::FirstToken).await,
            AccessStatus::Expired { .. } => self.issue_link(user_id, IssueReason::Expired).await,
        }
    }

    async fn issue_link(&self, user_id: i64, reason: IssueReason) -> StoreResult<GateOutcome> {
        let record = self.issuer.issue(user_id).await?;
        Ok(GateOutcome::LinkIssued {
            link: self.links.token_link(&record.token).await,
            expires_at: record.expires_at,
            reason,
        })
    }
}
