use lb_core::model::Lobby;
use lb_core::structs::Data;
use poise::serenity_prelude::GuildChannel;
use tracing::error;

use crate::common::{ChannelRef, require_lobby};
use crate::{Command, CommandResponse, Context, Error};

pub fn commands() -> [Command; 1] {
    [reset()]
}

/// Reset bot settings.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    subcommands("lobby")
)]
pub async fn reset(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Lobby settings.
#[poise::command(slash_command, subcommands("capacity", "name"))]
async fn lobby(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Set new room capacity to default.
#[poise::command(slash_command)]
async fn capacity(
    ctx: Context<'_>,
    #[description = "A lobby to be configured."]
    #[channel_types("Voice")]
    lobby: GuildChannel,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&lobby);
    reset_capacity(ctx.data(), &channel).await.send(ctx).await
}

/// Set new room name to default "Кімната %nickname%".
#[poise::command(slash_command)]
async fn name(
    ctx: Context<'_>,
    #[description = "A lobby to be configured."]
    #[channel_types("Voice")]
    lobby: GuildChannel,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&lobby);
    reset_name(ctx.data(), &channel).await.send(ctx).await
}

/// Capacity 0 is the canonical "unlimited"; spawned rooms read it as the
/// platform's no-limit sentinel.
async fn reset_capacity(data: &Data, channel: &ChannelRef) -> CommandResponse {
    let current = match require_lobby(data, channel).await {
        Ok(lobby) => lobby,
        Err(response) => return response,
    };

    let update = Lobby {
        id: channel.id,
        guild_id: channel.guild_id,
        category_id: current.category_id,
        template: None,
        capacity: Some(0),
    };

    match data.lobbies().upsert(&update).await {
        Ok(()) => CommandResponse::success(format!(
            "Capacity successfully reset for \"{}\".",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to update the lobby");
            CommandResponse::failure("Unable to update lobby!")
        }
    }
}

/// An empty template is stored as present-empty; room naming falls back
/// to the default localized prefix when it sees one.
async fn reset_name(data: &Data, channel: &ChannelRef) -> CommandResponse {
    let current = match require_lobby(data, channel).await {
        Ok(lobby) => lobby,
        Err(response) => return response,
    };

    let update = Lobby {
        id: channel.id,
        guild_id: channel.guild_id,
        category_id: current.category_id,
        template: Some(String::new()),
        capacity: None,
    };

    match data.lobbies().upsert(&update).await {
        Ok(()) => CommandResponse::success(format!(
            "Name successfully reset to default for {}.",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to update the lobby");
            CommandResponse::failure("Unable to update lobby!")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{GUILD, data, voice_channel};
    use crate::respond::ResponseKind;

    async fn register(data: &Data, channel: &ChannelRef) {
        data.lobbies()
            .register(&Lobby {
                id: channel.id,
                guild_id: channel.guild_id,
                category_id: channel.parent_id.unwrap(),
                template: Some("Squad".to_owned()),
                capacity: Some(4),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reset_capacity_keeps_the_template() {
        let data = data().await;
        let channel = voice_channel(1);
        register(&data, &channel).await;

        let response = reset_capacity(&data, &channel).await;
        assert_eq!(response.kind, ResponseKind::Success);

        let stored = data.lobbies().get(GUILD, channel.id).await.unwrap().unwrap();
        assert_eq!(stored.capacity, Some(0));
        assert_eq!(stored.template.as_deref(), Some("Squad"));
    }

    #[tokio::test]
    async fn reset_name_keeps_the_capacity() {
        let data = data().await;
        let channel = voice_channel(1);
        register(&data, &channel).await;

        let response = reset_name(&data, &channel).await;
        assert_eq!(response.kind, ResponseKind::Success);

        let stored = data.lobbies().get(GUILD, channel.id).await.unwrap().unwrap();
        assert_eq!(stored.template.as_deref(), Some(""));
        assert_eq!(stored.capacity, Some(4));
    }

    #[tokio::test]
    async fn resets_on_unregistered_channels_warn() {
        let data = data().await;
        let channel = voice_channel(1);

        let capacity = reset_capacity(&data, &channel).await;
        assert_eq!(capacity.kind, ResponseKind::Warning);

        let name = reset_name(&data, &channel).await;
        assert_eq!(name.kind, ResponseKind::Warning);
    }
}
