//! Registered users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;

use super::db::{format_timestamp, SqliteStore};
use crate::core::error::StoreResult;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_exists(&self, user_id: i64) -> StoreResult<bool>;

    /// Registers the user if unknown. Returns true when a new record was created.
    async fn add_user(&self, user_id: i64, joined_at: DateTime<Utc>) -> StoreResult<bool>;

    async fn all_user_ids(&self) -> StoreResult<Vec<i64>>;

    async fn count_users(&self) -> StoreResult<usize>;

    async fn delete_user(&self, user_id: i64) -> StoreResult<bool>;

    /// Administrative wipe. Returns the number of removed users.
    async fn delete_all_users(&self) -> StoreResult<usize>;
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn user_exists(&self, user_id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)",
                params![user_id],
                |row| row.get(0),
            )
        })
    }

    async fn add_user(&self, user_id: i64, joined_at: DateTime<Utc>) -> StoreResult<bool> {
        let inserted = self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (user_id, joined_at) VALUES (?1, ?2)",
                params![user_id, format_timestamp(&joined_at)],
            )
        })?;
        Ok(inserted > 0)
    }

    async fn all_user_ids(&self) -> StoreResult<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY joined_at, user_id")?;
            let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
            rows.collect()
        })
    }

    async fn count_users(&self) -> StoreResult<usize> {
        let count: i64 = self.with_conn(|conn| conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn delete_user(&self, user_id: i64) -> StoreResult<bool> {
        let deleted = self.with_conn(|conn| conn.execute("DELETE FROM users WHERE user_id = ?1", params![user_id]))?;
        Ok(deleted > 0)
    }

    async fn delete_all_users(&self) -> StoreResult<usize> {
        self.with_conn(|conn| conn.execute("DELETE FROM users", []))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.sqlite");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_add_user_is_idempotent() {
        let (_dir, store) = store();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert!(!store.user_exists(10).await.unwrap());
        assert!(store.add_user(10, now).await.unwrap());
        assert!(!store.add_user(10, now).await.unwrap());
        assert!(store.user_exists(10).await.unwrap());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_all_user_ids_in_join_order() {
        let (_dir, store) = store();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.add_user(30, base + chrono::TimeDelta::seconds(2)).await.unwrap();
        store.add_user(10, base).await.unwrap();
        store.add_user(20, base + chrono::TimeDelta::seconds(1)).await.unwrap();

        assert_eq!(store.all_user_ids().await.unwrap(), vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_delete_user_and_wipe() {
        let (_dir, store) = store();
        let now = Utc::now();
        for id in [1, 2, 3] {
            store.add_user(id, now).await.unwrap();
        }

        assert!(store.delete_user(2).await.unwrap());
        assert!(!store.user_exists(2).await.unwrap());
        assert_eq!(store.delete_all_users().await.unwrap(), 2);
        assert!(store.all_user_ids().await.unwrap().is_empty());
    }
}
