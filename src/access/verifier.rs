use chrono::{DateTime, Utc};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::core::clock::Clock;
use crate::core::error::StoreResult;
use crate::storage::tokens::{TokenRecord, TokenStore};

/// Outcome of presenting a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Valid,
    /// A live token exists but the presented one differs
    Invalid,
    /// The stored token has expired; the presented string is not compared
    Expired,
    /// The user has never been issued a token (or it was wiped)
    NotFound,
}

/// Verification result together with the record it was checked against.
#[derive(Debug, Clone)]
pub struct Verification {
    pub result: VerificationResult,
    pub record: Option<TokenRecord>,
}

/// Where a user currently stands, read without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessStatus {
    NoToken,
    /// Issued, not yet presented back, still live
    Pending { token: String, expires_at: DateTime<Utc> },
    /// Presented back and still live
    Valid { expires_at: DateTime<Utc> },
    Expired { expired_at: DateTime<Utc> },
}

/// Constant-time equality over the raw bytes.
fn tokens_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

#[derive(Clone)]
pub struct TokenVerifier {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn verify(&self, user_id: i64, presented: &str) -> StoreResult<VerificationResult> {
        Ok(self.check(user_id, presented).await?.result)
    }

    /// Compares `presented` with the stored token. A successful check marks the
    /// record verified; the token value itself is never changed here.
    pub async fn check(&self, user_id: i64, presented: &str) -> StoreResult<Verification> {
        let Some(mut record) = self.store.find_token(user_id).await? else {
            return Ok(Verification {
                result: VerificationResult::NotFound,
                record: None,
            });
        };

        let result = if record.is_expired_at(self.clock.now()) {
            VerificationResult::Expired
        } else if !tokens_match(&record.token, presented) {
            VerificationResult::Invalid
        } else {
            if !record.verified {
                // Conditional on the token: a concurrent re-issue wins and stays unverified
                if self.store.mark_verified(user_id, &record.token).await? {
                    record.verified = true;
                } else {
                    log::info!("Token of user {} was replaced while verifying", user_id);
                }
            }
            VerificationResult::Valid
        };

        log::debug!("Token check for user {}: {:?}", user_id, result);
        Ok(Verification {
            result,
            record: Some(record),
        })
    }

    pub async fn status(&self, user_id: i64) -> StoreResult<AccessStatus> {
        let Some(record) = self.store.find_token(user_id).await? else {
            return Ok(AccessStatus::NoToken);
        };

        Ok(if record.is_expired_at(self.clock.now()) {
            AccessStatus::Expired {
                expired_at: record.expires_at,
            }
        } else if record.verified {
            AccessStatus::Valid {
                expires_at: record.expires_at,
            }
        } else {
            AccessStatus::Pending {
                token: record.token,
                expires_at: record.expires_at,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match_is_byte_exact() {
        assert!(tokens_match("abc123", "abc123"));
        assert!(!tokens_match("abc123", "ABC123"));
        assert!(!tokens_match("abc123", "abc123x"));
        assert!(!tokens_match("abc123", "abc12"));
        assert!(!tokens_match("abc123", ""));
    }
}
