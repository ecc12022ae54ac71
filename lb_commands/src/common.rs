use lb_core::model::Lobby;
use lb_core::structs::Data;
use poise::serenity_prelude::{ChannelId, GuildChannel, GuildId};
use tracing::error;

use crate::CommandResponse;

/// The slice of channel metadata the lobby commands operate on.
#[derive(Debug, Clone)]
pub(crate) struct ChannelRef {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub parent_id: Option<ChannelId>,
    pub name: String,
}

impl ChannelRef {
    pub fn from_channel(channel: &GuildChannel) -> Self {
        ChannelRef {
            id: channel.id,
            guild_id: channel.guild_id,
            parent_id: channel.parent_id,
            name: channel.name.clone(),
        }
    }
}

pub(crate) fn not_a_lobby(name: &str) -> CommandResponse {
    CommandResponse::warning(format!("\"{name}\" is not a lobby!"))
}

/// Look the channel up as a lobby; a missing row means the caller picked
/// a channel that was never registered.
pub(crate) async fn require_lobby(
    data: &Data,
    channel: &ChannelRef,
) -> Result<Lobby, CommandResponse> {
    match data.lobbies().get(channel.guild_id, channel.id).await {
        Ok(Some(lobby)) => Ok(lobby),
        Ok(None) => Err(not_a_lobby(&channel.name)),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to look up the lobby");
            Err(CommandResponse::failure("Unable to update lobby!"))
        }
    }
}
