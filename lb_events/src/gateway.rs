use poise::serenity_prelude::{
    self as serenity, ChannelId, ChannelType, CreateChannel, GuildId, UserId,
};
use std::time::Duration;
use tokio::time::timeout;

use crate::Error;

/// The remote side of room management. Reconciliation decides against
/// local state only and goes through this seam for every platform call.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        name: &str,
        category_id: ChannelId,
        user_limit: u32,
    ) -> Result<ChannelId, Error>;

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), Error>;

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), Error>;
}

/// Events are handled one at a time, so a hung call here would stall the
/// whole pipeline without this bound.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DiscordGateway<'a> {
    pub http: &'a serenity::Http,
}

impl Gateway for DiscordGateway<'_> {
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        name: &str,
        category_id: ChannelId,
        user_limit: u32,
    ) -> Result<ChannelId, Error> {
        let builder = CreateChannel::new(name)
            .kind(ChannelType::Voice)
            .category(category_id)
            .user_limit(user_limit);

        let channel = timeout(CALL_TIMEOUT, guild_id.create_channel(self.http, builder)).await??;

        Ok(channel.id)
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), Error> {
        timeout(CALL_TIMEOUT, channel_id.delete(self.http)).await??;

        Ok(())
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), Error> {
        timeout(
            CALL_TIMEOUT,
            guild_id.move_member(self.http, user_id, channel_id),
        )
        .await??;

        Ok(())
    }
}
