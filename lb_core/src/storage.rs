//! Storage bootstrap: pool construction and idempotent schema creation.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const LOBBY_TABLE: &str = "
CREATE TABLE IF NOT EXISTS lobbies(
    id          INTEGER NOT NULL,
    guild_id    INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    template    TEXT,
    capacity    INTEGER,
    PRIMARY KEY (id, guild_id)
)";

const CHANNEL_TABLE: &str = "
CREATE TABLE IF NOT EXISTS channels(
    id        INTEGER PRIMARY KEY,
    parent_id INTEGER NOT NULL
)";

const CHANNEL_MEMBERS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS channel_members(
    guild_id   INTEGER NOT NULL,
    user_id    INTEGER NOT NULL,
    channel_id INTEGER NOT NULL,
    PRIMARY KEY (guild_id, user_id)
)";

/// Open the database at `database_url`, creating the file and the schema
/// when missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    init(&pool).await?;

    Ok(pool)
}

/// Create the tables. Safe to run on every startup.
pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in [LOBBY_TABLE, CHANNEL_TABLE, CHANNEL_MEMBERS_TABLE] {
        sqlx::query(table).execute(pool).await?;
    }

    Ok(())
}
