//! Store views over the shared pool, one per table.
//!
//! Every operation is a single statement; there are no cross-store
//! transactions. Retry policy belongs to the caller.

mod channel;
mod lobby;
mod members;

pub use channel::ChannelStore;
pub use lobby::LobbyStore;
pub use members::MemberStore;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
    use std::str::FromStr;

    /// In-memory pool with the schema applied. Single connection so every
    /// query sees the same database.
    pub async fn pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::storage::init(&pool).await.unwrap();
        pool
    }
}
