#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use poise::serenity_prelude as serenity;

pub(crate) use lb_core::structs::{Data, Error};

mod gateway;
mod voice;

pub use gateway::{DiscordGateway, Gateway};
pub use voice::{PresenceEvent, SweepOutcome, reconcile};

pub async fn handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            tracing::info!("Logged in as {}", data_about_bot.user.tag());
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            // Updates outside a guild carry nothing to reconcile.
            let Some(event) = voice::PresenceEvent::from_update(old.as_ref(), new) else {
                return Ok(());
            };

            let gateway = gateway::DiscordGateway { http: &ctx.http };
            voice::reconcile(data, &gateway, &event).await;
        }
        _ => {}
    }
    Ok(())
}
