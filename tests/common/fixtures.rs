//! Test fixtures
//!
//! Provides TestEnvironment that sets up everything the access tests need:
//! - Temporary SQLite database with migrations applied
//! - Manual clock
//! - Recording transport
//! - Wired gate and handler dependencies

#![allow(dead_code)]

use chrono::{TimeDelta, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use linkvault::access::{AccessGate, LinkBuilder, TokenIssuer, TokenVerifier};
use linkvault::core::config::RelaySettings;
use linkvault::core::{Clock, ManualClock};
use linkvault::storage::{SqliteStore, TokenStore, UserStore};
use linkvault::telegram::{HandlerDeps, UserInfo};

use super::RecordingTransport;

pub const VALIDITY_SECS: i64 = 100;
pub const ARCHIVE_CHANNEL: i64 = -1001234567890;
pub const ADMIN_ID: i64 = 1;

pub struct TestEnvironment {
    /// Keeps the database directory alive
    _dir: TempDir,
    pub db_path: PathBuf,
    pub store: Arc<SqliteStore>,
    pub clock: Arc<ManualClock>,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
    pub gate: AccessGate,
    pub deps: HandlerDeps,
    pub transport: RecordingTransport,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_validity(VALIDITY_SECS)
    }

    pub fn with_validity(validity_secs: i64) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("linkvault-test.sqlite");
        let store = Arc::new(SqliteStore::open(db_path.to_str().expect("utf-8 path")).expect("open store"));

        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let tokens: Arc<dyn TokenStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();

        let issuer = TokenIssuer::new(tokens.clone(), dyn_clock.clone(), TimeDelta::seconds(validity_secs));
        let verifier = TokenVerifier::new(tokens.clone(), dyn_clock.clone());
        let links = Arc::new(LinkBuilder::new("t.me", "vault_bot", None));
        let gate = AccessGate::new(users.clone(), issuer.clone(), verifier.clone(), links, dyn_clock);

        let relay = RelaySettings {
            channel_id: ARCHIVE_CHANNEL,
            protect_content: true,
            max_messages: 5,
        };
        let deps = HandlerDeps::new(
            gate.clone(),
            tokens,
            users,
            relay,
            vec![ADMIN_ID],
            "Hello {first}! Your id is {id}.".to_string(),
        );

        Self {
            _dir: dir,
            db_path,
            store,
            clock,
            issuer,
            verifier,
            gate,
            deps,
            transport: RecordingTransport::new(),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(TimeDelta::seconds(secs));
    }

    pub fn user(&self, user_id: i64) -> UserInfo {
        UserInfo::new(user_id, format!("User{}", user_id))
    }

    /// Runs raw SQL against the test database behind the store's back
    pub fn run_sql(&self, sql: &str) {
        let conn = rusqlite::Connection::open(&self.db_path).expect("open database");
        conn.execute_batch(sql).expect("run sql");
    }

    /// Drops `table` so every later query on it fails
    pub fn drop_table(&self, table: &str) {
        self.run_sql(&format!("DROP TABLE {}", table));
    }

    pub async fn register(&self, user_ids: &[i64]) {
        for &user_id in user_ids {
            self.store.add_user(user_id, self.clock.now()).await.expect("add user");
        }
    }
}
