use lb_core::model::{DEFAULT_TEMPLATE, Lobby};
use lb_core::structs::Data;
use poise::serenity_prelude::GuildChannel;
use tracing::{error, warn};

use crate::common::{ChannelRef, not_a_lobby, require_lobby};
use crate::{Command, CommandResponse, Context, Error};

pub fn commands() -> [Command; 1] {
    [lobby()]
}

/// Lobbies' commands group.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    subcommands("register", "capacity", "name", "list", "remove")
)]
pub async fn lobby(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Register a new lobby.
#[poise::command(slash_command)]
async fn register(
    ctx: Context<'_>,
    #[description = "A channel to be registered."]
    #[channel_types("Voice")]
    channel: GuildChannel,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&channel);
    register_lobby(ctx.data(), &channel).await.send(ctx).await
}

/// Select new lobbies' capacity.
#[poise::command(slash_command)]
async fn capacity(
    ctx: Context<'_>,
    #[description = "A lobby to be configured."]
    #[channel_types("Voice")]
    lobby: GuildChannel,
    #[description = "A new lobbies' capacity."] capacity: i64,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&lobby);
    set_capacity(ctx.data(), &channel, capacity)
        .await
        .send(ctx)
        .await
}

/// Select new channels' name when created.
#[poise::command(slash_command)]
async fn name(
    ctx: Context<'_>,
    #[description = "A lobby to be configured."]
    #[channel_types("Voice")]
    lobby: GuildChannel,
    #[description = "A new channels' name when created."] name: String,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&lobby);
    set_name(ctx.data(), &channel, name).await.send(ctx).await
}

/// Show registered lobbies.
#[poise::command(slash_command)]
async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let lobbies = match ctx.data().lobbies().all(guild_id).await {
        Ok(lobbies) => lobbies,
        Err(error) => {
            error!(%error, "unable to get lobbies");
            return CommandResponse::failure("Unable to get lobbies!")
                .send(ctx)
                .await;
        }
    };

    let mut lines = Vec::with_capacity(lobbies.len());
    for (index, lobby) in lobbies.iter().enumerate() {
        // The registration may outlive the channel; fall back to the raw
        // id instead of failing the whole listing.
        let name = match lobby.id.to_channel(&ctx.serenity_context().http).await {
            Ok(channel) => channel
                .guild()
                .map_or_else(|| lobby.id.to_string(), |channel| channel.name),
            Err(error) => {
                warn!(%error, channel = %lobby.id, "unable to fetch the lobby channel");
                lobby.id.to_string()
            }
        };
        lines.push(describe_lobby(index, &name, lobby));
    }

    let response = if lines.is_empty() {
        CommandResponse::warning("There are no active lobbies.")
    } else {
        CommandResponse::success(format!("Active Lobbies:\n{}", lines.join("\n")))
    };
    response.send(ctx).await
}

/// Remove an existing lobby.
#[poise::command(slash_command)]
async fn remove(
    ctx: Context<'_>,
    #[description = "A lobby to be removed."]
    #[channel_types("Voice")]
    lobby: GuildChannel,
) -> Result<(), Error> {
    let channel = ChannelRef::from_channel(&lobby);
    remove_lobby(ctx.data(), &channel).await.send(ctx).await
}

async fn register_lobby(data: &Data, channel: &ChannelRef) -> CommandResponse {
    let Some(category_id) = channel.parent_id else {
        return CommandResponse::warning(format!(
            "\"{}\" is not under a category!",
            channel.name
        ));
    };

    let lobby = Lobby {
        id: channel.id,
        guild_id: channel.guild_id,
        category_id,
        template: None,
        capacity: None,
    };

    match data.lobbies().register(&lobby).await {
        Ok(0) => CommandResponse::warning(format!(
            "\"{}\" is already registered as a lobby!",
            channel.name
        )),
        Ok(_) => CommandResponse::success(format!(
            "Lobby \"{}\" successfully registered.",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to register the lobby");
            CommandResponse::failure(format!(
                "Lobby \"{}\" cannot be registered.",
                channel.name
            ))
        }
    }
}

async fn set_capacity(data: &Data, channel: &ChannelRef, capacity: i64) -> CommandResponse {
    if capacity <= 0 {
        return CommandResponse::warning("User limit must be positive!");
    }

    let current = match require_lobby(data, channel).await {
        Ok(lobby) => lobby,
        Err(response) => return response,
    };

    let update = Lobby {
        id: channel.id,
        guild_id: channel.guild_id,
        category_id: current.category_id,
        template: None,
        capacity: Some(capacity as u32),
    };

    match data.lobbies().upsert(&update).await {
        Ok(()) => CommandResponse::success(format!(
            "Capacity {capacity} successfully set for \"{}\".",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to update the lobby");
            CommandResponse::failure("Unable to update lobby!")
        }
    }
}

async fn set_name(data: &Data, channel: &ChannelRef, template: String) -> CommandResponse {
    let current = match require_lobby(data, channel).await {
        Ok(lobby) => lobby,
        Err(response) => return response,
    };

    let update = Lobby {
        id: channel.id,
        guild_id: channel.guild_id,
        category_id: current.category_id,
        template: Some(template.clone()),
        capacity: None,
    };

    match data.lobbies().upsert(&update).await {
        Ok(()) => CommandResponse::success(format!(
            "Name {template} successfully set for {}.",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to update the lobby");
            CommandResponse::failure("Unable to update lobby!")
        }
    }
}

async fn remove_lobby(data: &Data, channel: &ChannelRef) -> CommandResponse {
    match data.lobbies().delete(channel.guild_id, channel.id).await {
        Ok(0) => not_a_lobby(&channel.name),
        Ok(_) => CommandResponse::success(format!(
            "Lobby \"{}\" successfully unregistered.",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to delete the lobby");
            CommandResponse::failure(format!(
                "Unable to unregister \"{}\" lobby.",
                channel.name
            ))
        }
    }
}

fn describe_lobby(index: usize, name: &str, lobby: &Lobby) -> String {
    let template = match lobby.template.as_deref() {
        Some(template) if !template.is_empty() => template.to_owned(),
        _ => format!("{DEFAULT_TEMPLATE} %username%"),
    };

    let capacity = match lobby.capacity {
        Some(capacity) if capacity > 0 => capacity.to_string(),
        _ => "default".to_owned(),
    };

    format!(
        "{}. Name: {name}, Channel template: {template}, Capacity: {capacity}",
        index + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{GUILD, data, voice_channel};
    use crate::respond::ResponseKind;
    use poise::serenity_prelude::ChannelId;

    #[tokio::test]
    async fn register_then_duplicate_register_warns() {
        let data = data().await;
        let channel = voice_channel(1);

        let first = register_lobby(&data, &channel).await;
        assert_eq!(first.kind, ResponseKind::Success);

        let second = register_lobby(&data, &channel).await;
        assert_eq!(second.kind, ResponseKind::Warning);

        assert_eq!(data.lobbies().all(GUILD).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_without_category_warns() {
        let data = data().await;
        let mut channel = voice_channel(1);
        channel.parent_id = None;

        let response = register_lobby(&data, &channel).await;
        assert_eq!(response.kind, ResponseKind::Warning);
        assert!(data.lobbies().all(GUILD).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_positive_capacity_warns_without_mutation() {
        let data = data().await;
        let channel = voice_channel(1);
        register_lobby(&data, &channel).await;
        set_name(&data, &channel, "Squad".to_owned()).await;

        for bad in [0, -3] {
            let response = set_capacity(&data, &channel, bad).await;
            assert_eq!(response.kind, ResponseKind::Warning);
        }

        let stored = data.lobbies().get(GUILD, channel.id).await.unwrap().unwrap();
        assert_eq!(stored.capacity, None);
        assert_eq!(stored.template.as_deref(), Some("Squad"));
    }

    #[tokio::test]
    async fn capacity_on_unregistered_channel_warns() {
        let data = data().await;

        let response = set_capacity(&data, &voice_channel(1), 4).await;
        assert_eq!(response.kind, ResponseKind::Warning);
    }

    #[tokio::test]
    async fn capacity_update_preserves_template() {
        let data = data().await;
        let channel = voice_channel(1);
        register_lobby(&data, &channel).await;
        set_name(&data, &channel, "Squad".to_owned()).await;

        let response = set_capacity(&data, &channel, 4).await;
        assert_eq!(response.kind, ResponseKind::Success);

        let stored = data.lobbies().get(GUILD, channel.id).await.unwrap().unwrap();
        assert_eq!(stored.capacity, Some(4));
        assert_eq!(stored.template.as_deref(), Some("Squad"));
    }

    #[tokio::test]
    async fn name_update_preserves_capacity() {
        let data = data().await;
        let channel = voice_channel(1);
        register_lobby(&data, &channel).await;
        set_capacity(&data, &channel, 6).await;

        let response = set_name(&data, &channel, "Duo".to_owned()).await;
        assert_eq!(response.kind, ResponseKind::Success);

        let stored = data.lobbies().get(GUILD, channel.id).await.unwrap().unwrap();
        assert_eq!(stored.capacity, Some(6));
        assert_eq!(stored.template.as_deref(), Some("Duo"));
    }

    #[tokio::test]
    async fn remove_reports_unknown_lobbies() {
        let data = data().await;
        let channel = voice_channel(1);
        register_lobby(&data, &channel).await;

        let removed = remove_lobby(&data, &channel).await;
        assert_eq!(removed.kind, ResponseKind::Success);

        let again = remove_lobby(&data, &channel).await;
        assert_eq!(again.kind, ResponseKind::Warning);
    }

    #[test]
    fn describe_lobby_falls_back_to_defaults() {
        let lobby = Lobby {
            id: ChannelId::new(1),
            guild_id: GUILD,
            category_id: ChannelId::new(500),
            template: None,
            capacity: None,
        };

        assert_eq!(
            describe_lobby(0, "duos", &lobby),
            "1. Name: duos, Channel template: Кімната %username%, Capacity: default"
        );
    }

    #[test]
    fn describe_lobby_shows_configured_values() {
        let lobby = Lobby {
            id: ChannelId::new(1),
            guild_id: GUILD,
            category_id: ChannelId::new(500),
            template: Some("Squad".to_owned()),
            capacity: Some(4),
        };

        assert_eq!(
            describe_lobby(1, "squads", &lobby),
            "2. Name: squads, Channel template: Squad, Capacity: 4"
        );
    }
}
