//! Access-token records and their store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::db::{format_timestamp, parse_timestamp, SqliteStore};
use crate::core::error::StoreResult;

/// The single active access token of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub user_id: i64,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once the user has presented the token back to the bot.
    pub verified: bool,
}

impl TokenRecord {
    /// A token is expired from `expires_at` onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Persistent mapping from user id to that user's current token record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_token(&self, user_id: i64) -> StoreResult<Option<TokenRecord>>;

    /// Inserts the record, replacing whatever the user had before.
    async fn upsert_token(&self, record: &TokenRecord) -> StoreResult<()>;

    /// Flags the record as verified, but only while `token` is still the stored one.
    /// Returns whether a row was updated.
    async fn mark_verified(&self, user_id: i64, token: &str) -> StoreResult<bool>;

    async fn delete_token(&self, user_id: i64) -> StoreResult<bool>;

    /// Administrative wipe. Returns the number of removed records.
    async fn delete_all_tokens(&self) -> StoreResult<usize>;
}

#[async_trait]
impl TokenStore for SqliteStore {
    async fn find_token(&self, user_id: i64) -> StoreResult<Option<TokenRecord>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT token, issued_at, expires_at, verified FROM access_tokens WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, bool>(3)?,
                    ))
                },
            )
            .optional()
        })?;

        let Some((token, issued_at, expires_at, verified)) = row else {
            return Ok(None);
        };

        Ok(Some(TokenRecord {
            user_id,
            token,
            issued_at: parse_timestamp(user_id, &issued_at)?,
            expires_at: parse_timestamp(user_id, &expires_at)?,
            verified,
        }))
    }

    async fn upsert_token(&self, record: &TokenRecord) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO access_tokens (user_id, token, issued_at, expires_at, verified)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    token = excluded.token,
                    issued_at = excluded.issued_at,
                    expires_at = excluded.expires_at,
                    verified = excluded.verified",
                params![
                    record.user_id,
                    record.token,
                    format_timestamp(&record.issued_at),
                    format_timestamp(&record.expires_at),
                    record.verified
                ],
            )
        })?;
        Ok(())
    }

    async fn mark_verified(&self, user_id: i64, token: &str) -> StoreResult<bool> {
        let updated = self.with_conn(|conn| {
            conn.execute(
                "UPDATE access_tokens SET verified = 1 WHERE user_id = ?1 AND token = ?2",
                params![user_id, token],
            )
        })?;
        Ok(updated > 0)
    }

    async fn delete_token(&self, user_id: i64) -> StoreResult<bool> {
        let deleted =
            self.with_conn(|conn| conn.execute("DELETE FROM access_tokens WHERE user_id = ?1", params![user_id]))?;
        Ok(deleted > 0)
    }

    async fn delete_all_tokens(&self) -> StoreResult<usize> {
        self.with_conn(|conn| conn.execute("DELETE FROM access_tokens", []))
    }
}
