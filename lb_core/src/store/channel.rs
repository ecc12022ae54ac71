use poise::serenity_prelude::ChannelId;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreError;
use crate::model::EphemeralChannel;

/// Currently-live bot-created rooms and the lobby each one came from.
pub struct ChannelStore {
    db: SqlitePool,
}

impl ChannelStore {
    #[must_use]
    pub fn new(pool: &SqlitePool) -> Self {
        ChannelStore { db: pool.clone() }
    }

    pub async fn get(&self, id: ChannelId) -> Result<Option<EphemeralChannel>, StoreError> {
        debug!(channel = %id, "store: get channel");

        let row = sqlx::query("SELECT id, parent_id FROM channels WHERE id = ?")
            .bind(id.get() as i64)
            .fetch_optional(&self.db)
            .await?;

        row.map(|row| from_row(&row)).transpose().map_err(Into::into)
    }

    pub async fn all(&self) -> Result<Vec<EphemeralChannel>, StoreError> {
        debug!("store: get channels");

        let rows = sqlx::query("SELECT id, parent_id FROM channels")
            .fetch_all(&self.db)
            .await?;

        let mut channels = Vec::with_capacity(rows.len());
        for row in &rows {
            channels.push(from_row(row)?);
        }

        Ok(channels)
    }

    pub async fn insert(&self, channel: &EphemeralChannel) -> Result<(), StoreError> {
        debug!(channel = %channel.id, parent = %channel.parent_id, "store: set channel");

        sqlx::query("REPLACE INTO channels (id, parent_id) VALUES (?, ?)")
            .bind(channel.id.get() as i64)
            .bind(channel.parent_id.get() as i64)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Returns the affected row count; 0 means the record was already gone.
    pub async fn delete(&self, id: ChannelId) -> Result<u64, StoreError> {
        debug!(channel = %id, "store: delete channel");

        let result = sqlx::query("DELETE FROM channels WHERE id = ?")
            .bind(id.get() as i64)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

fn from_row(row: &SqliteRow) -> Result<EphemeralChannel, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let parent_id: i64 = row.try_get("parent_id")?;

    Ok(EphemeralChannel {
        id: ChannelId::new(id as u64),
        parent_id: ChannelId::new(parent_id as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;

    fn channel(id: u64) -> EphemeralChannel {
        EphemeralChannel {
            id: ChannelId::new(id),
            parent_id: ChannelId::new(50),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = ChannelStore::new(&testing::pool().await);

        store.insert(&channel(1)).await.unwrap();

        let stored = store.get(ChannelId::new(1)).await.unwrap();
        assert_eq!(stored, Some(channel(1)));
        assert!(store.get(ChannelId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_is_a_replace() {
        let store = ChannelStore::new(&testing::pool().await);

        store.insert(&channel(1)).await.unwrap();
        let mut reparented = channel(1);
        reparented.parent_id = ChannelId::new(60);
        store.insert(&reparented).await.unwrap();

        let stored = store.get(ChannelId::new(1)).await.unwrap().unwrap();
        assert_eq!(stored.parent_id, ChannelId::new(60));
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows_through_row_count() {
        let store = ChannelStore::new(&testing::pool().await);
        store.insert(&channel(1)).await.unwrap();

        assert_eq!(store.delete(ChannelId::new(1)).await.unwrap(), 1);
        assert_eq!(store.delete(ChannelId::new(1)).await.unwrap(), 0);
        assert!(store.all().await.unwrap().is_empty());
    }
}
