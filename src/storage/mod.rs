//! Persistence: connection pool, migrations, token and user stores

pub mod db;
pub mod migrations;
pub mod tokens;
pub mod users;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool, SqliteStore};
pub use tokens::{TokenRecord, TokenStore};
pub use users::UserStore;
