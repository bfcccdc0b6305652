use chrono::TimeDelta;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::StoreResult;
use crate::storage::tokens::{TokenRecord, TokenStore};

/// 128 bits from the thread-local CSPRNG, hex encoded.
pub fn generate_token() -> String {
    hex::encode(rand::random::<u128>().to_be_bytes())
}

/// Creates access tokens. Each issue replaces the user's previous token.
#[derive(Clone)]
pub struct TokenIssuer {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    validity: TimeDelta,
}

impl TokenIssuer {
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>, validity: TimeDelta) -> Self {
        Self {
            store,
            clock,
            validity,
        }
    }

    pub fn validity(&self) -> TimeDelta {
        self.validity
    }

    /// Issues a fresh token valid for the configured period and stores it,
    /// invalidating any token the user held before.
    pub async fn issue(&self, user_id: i64) -> StoreResult<TokenRecord> {
        let issued_at = self.clock.now();
        let record = TokenRecord {
            user_id,
            token: generate_token(),
            issued_at,
            expires_at: issued_at + self.validity,
            verified: false,
        };

        self.store.upsert_token(&record).await?;
        log::info!("Issued access token for user {} (expires at {})", user_id, record.expires_at);

        Ok(record)
    }
}
