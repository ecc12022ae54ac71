use poise::serenity_prelude::{ChannelId, GuildId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreError;
use crate::model::Lobby;

/// Persistent lobby configuration, keyed by `(channel, guild)`.
pub struct LobbyStore {
    db: SqlitePool,
}

impl LobbyStore {
    #[must_use]
    pub fn new(pool: &SqlitePool) -> Self {
        LobbyStore { db: pool.clone() }
    }

    pub async fn get(&self, guild_id: GuildId, id: ChannelId) -> Result<Option<Lobby>, StoreError> {
        debug!(lobby = %id, guild = %guild_id, "store: get lobby");

        let row = sqlx::query(
            "SELECT id, guild_id, category_id, template, capacity
             FROM lobbies
             WHERE id = ? AND guild_id = ?",
        )
        .bind(id.get() as i64)
        .bind(guild_id.get() as i64)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| from_row(&row)).transpose().map_err(Into::into)
    }

    pub async fn all(&self, guild_id: GuildId) -> Result<Vec<Lobby>, StoreError> {
        debug!(guild = %guild_id, "store: get lobbies");

        let rows = sqlx::query(
            "SELECT id, guild_id, category_id, template, capacity
             FROM lobbies
             WHERE guild_id = ?",
        )
        .bind(guild_id.get() as i64)
        .fetch_all(&self.db)
        .await?;

        let mut lobbies = Vec::with_capacity(rows.len());
        for row in &rows {
            lobbies.push(from_row(row)?);
        }

        Ok(lobbies)
    }

    /// Insert a lobby, doing nothing when it is already registered.
    /// Returns the affected row count; 0 means "already a lobby".
    pub async fn register(&self, lobby: &Lobby) -> Result<u64, StoreError> {
        debug!(lobby = %lobby.id, guild = %lobby.guild_id, "store: register lobby");

        let result = sqlx::query(
            "INSERT INTO lobbies (id, guild_id, category_id, template, capacity)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id, guild_id) DO NOTHING",
        )
        .bind(lobby.id.get() as i64)
        .bind(lobby.guild_id.get() as i64)
        .bind(lobby.category_id.get() as i64)
        .bind(lobby.template.as_deref())
        .bind(lobby.capacity.map(i64::from))
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert-or-merge. `None` fields never overwrite stored values; the
    /// coalesce keeps whatever is already there.
    pub async fn upsert(&self, lobby: &Lobby) -> Result<(), StoreError> {
        debug!(lobby = %lobby.id, guild = %lobby.guild_id, "store: upsert lobby");

        sqlx::query(
            "INSERT INTO lobbies (id, guild_id, category_id, template, capacity)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id, guild_id)
             DO UPDATE SET
                 template = coalesce(excluded.template, template),
                 capacity = coalesce(excluded.capacity, capacity)",
        )
        .bind(lobby.id.get() as i64)
        .bind(lobby.guild_id.get() as i64)
        .bind(lobby.category_id.get() as i64)
        .bind(lobby.template.as_deref())
        .bind(lobby.capacity.map(i64::from))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Returns the affected row count; 0 means "was not a lobby".
    pub async fn delete(&self, guild_id: GuildId, id: ChannelId) -> Result<u64, StoreError> {
        debug!(lobby = %id, guild = %guild_id, "store: delete lobby");

        let result = sqlx::query("DELETE FROM lobbies WHERE id = ? AND guild_id = ?")
            .bind(id.get() as i64)
            .bind(guild_id.get() as i64)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

fn from_row(row: &SqliteRow) -> Result<Lobby, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let guild_id: i64 = row.try_get("guild_id")?;
    let category_id: i64 = row.try_get("category_id")?;
    let template: Option<String> = row.try_get("template")?;
    let capacity: Option<i64> = row.try_get("capacity")?;

    Ok(Lobby {
        id: ChannelId::new(id as u64),
        guild_id: GuildId::new(guild_id as u64),
        category_id: ChannelId::new(category_id as u64),
        template,
        capacity: capacity.map(|capacity| capacity as u32),
    })
}
