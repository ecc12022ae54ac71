use poise::serenity_prelude::{ChannelId, GuildId, UserId};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreError;

/// Which voice channel each member currently occupies, per guild.
///
/// Occupancy is always computed from these rows rather than asked of the
/// platform, so presence handling stays a pure function of local state.
pub struct MemberStore {
    db: SqlitePool,
}

impl MemberStore {
    #[must_use]
    pub fn new(pool: &SqlitePool) -> Self {
        MemberStore { db: pool.clone() }
    }

    /// Number of members currently recorded in `channel_id`. Channel ids
    /// are unique across guilds, so no further scoping is needed.
    pub async fn count(&self, channel_id: ChannelId) -> Result<i64, StoreError> {
        debug!(channel = %channel_id, "store: count channel members");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM channel_members WHERE channel_id = ?")
                .bind(channel_id.get() as i64)
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    /// Record `user_id` as occupying `channel_id`. A member occupies at
    /// most one channel per guild, so a second set moves them.
    pub async fn set(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), StoreError> {
        debug!(channel = %channel_id, member = %user_id, guild = %guild_id, "store: set channel member");

        sqlx::query(
            "INSERT INTO channel_members (guild_id, user_id, channel_id)
             VALUES (?, ?, ?)
             ON CONFLICT(guild_id, user_id)
             DO UPDATE SET channel_id = excluded.channel_id",
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(channel_id.get() as i64)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Clear the member's occupancy. Returns the affected row count; 0
    /// means there was nothing recorded.
    pub async fn remove(&self, guild_id: GuildId, user_id: UserId) -> Result<u64, StoreError> {
        debug!(member = %user_id, guild = %guild_id, "store: delete channel member");

        let result = sqlx::query("DELETE FROM channel_members WHERE guild_id = ? AND user_id = ?")
            .bind(guild_id.get() as i64)
            .bind(user_id.get() as i64)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Drop every record still pointing at `channel_id`. Cleanup for
    /// channels that no longer exist.
    pub async fn remove_channel(&self, channel_id: ChannelId) -> Result<u64, StoreError> {
        debug!(channel = %channel_id, "store: delete channel members");

        let result = sqlx::query("DELETE FROM channel_members WHERE channel_id = ?")
            .bind(channel_id.get() as i64)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;

    const GUILD: GuildId = GuildId::new(10);
    const CHANNEL: ChannelId = ChannelId::new(20);
    const OTHER: ChannelId = ChannelId::new(21);

    #[tokio::test]
    async fn count_tracks_joins_and_leaves() {
        let store = MemberStore::new(&testing::pool().await);

        store.set(GUILD, UserId::new(1), CHANNEL).await.unwrap();
        store.set(GUILD, UserId::new(2), CHANNEL).await.unwrap();
        assert_eq!(store.count(CHANNEL).await.unwrap(), 2);

        assert_eq!(store.remove(GUILD, UserId::new(1)).await.unwrap(), 1);
        assert_eq!(store.count(CHANNEL).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_moves_a_member_between_channels() {
        let store = MemberStore::new(&testing::pool().await);

        store.set(GUILD, UserId::new(1), CHANNEL).await.unwrap();
        store.set(GUILD, UserId::new(1), OTHER).await.unwrap();

        assert_eq!(store.count(CHANNEL).await.unwrap(), 0);
        assert_eq!(store.count(OTHER).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_of_absent_member_is_a_counted_noop() {
        let store = MemberStore::new(&testing::pool().await);

        assert_eq!(store.remove(GUILD, UserId::new(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_channel_clears_every_straggler() {
        let store = MemberStore::new(&testing::pool().await);

        store.set(GUILD, UserId::new(1), CHANNEL).await.unwrap();
        store.set(GUILD, UserId::new(2), CHANNEL).await.unwrap();
        store.set(GUILD, UserId::new(3), OTHER).await.unwrap();

        assert_eq!(store.remove_channel(CHANNEL).await.unwrap(), 2);
        assert_eq!(store.count(CHANNEL).await.unwrap(), 0);
        assert_eq!(store.count(OTHER).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn guilds_track_the_same_member_independently() {
        let store = MemberStore::new(&testing::pool().await);
        let elsewhere = GuildId::new(11);

        store.set(GUILD, UserId::new(1), CHANNEL).await.unwrap();
        store.set(elsewhere, UserId::new(1), OTHER).await.unwrap();

        assert_eq!(store.remove(GUILD, UserId::new(1)).await.unwrap(), 1);
        assert_eq!(store.count(CHANNEL).await.unwrap(), 0);
        assert_eq!(store.count(OTHER).await.unwrap(), 1);
    }
}
