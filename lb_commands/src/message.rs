use poise::serenity_prelude::GuildChannel;
use tracing::{error, info};

use crate::{Command, CommandResponse, Context, Error};

pub fn commands() -> [Command; 1] {
    [message()]
}

/// Message' commands group.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    subcommands("all")
)]
pub async fn message(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Message to a channel.
#[poise::command(slash_command)]
async fn all(
    ctx: Context<'_>,
    #[description = "A channel to be messaged."]
    #[channel_types("Text")]
    channel: GuildChannel,
    #[description = "A message to be sent."] message: String,
) -> Result<(), Error> {
    info!(channel = %channel.id, "broadcasting a message");

    let response = match channel
        .id
        .say(&ctx.serenity_context().http, message.clone())
        .await
    {
        Ok(_) => CommandResponse::success(format!(
            "Message \"{message}\" successfully sent to channel \"{}\".",
            channel.name
        )),
        Err(error) => {
            error!(%error, channel = %channel.id, "unable to send the message");
            CommandResponse::failure(format!(
                "Unable to send the message to \"{}\".",
                channel.name
            ))
        }
    };

    response.send(ctx).await
}
