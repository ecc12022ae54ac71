//! Voice presence reconciliation.
//!
//! Every voice state change runs the same fixed pipeline: drop the
//! member's previous occupancy, record the new one, sweep every tracked
//! room for emptiness, then spawn rooms for any lobby the member just
//! joined. The sweep runs on every event, not just departures, so a
//! cleanup missed once (gateway hiccup, crash) is repaired by the next
//! event that comes along.

use lb_core::model::EphemeralChannel;
use poise::serenity_prelude::{ChannelId, GuildId, UserId, VoiceState};
use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::{Data, Error};

/// A single voice occupancy change, reduced to what reconciliation needs.
#[derive(Debug, Clone)]
pub struct PresenceEvent {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    pub old_channel: Option<ChannelId>,
    pub new_channel: Option<ChannelId>,
}

impl PresenceEvent {
    /// Reduce a gateway voice state pair. `None` for updates outside a
    /// guild, which carry nothing to reconcile.
    #[must_use]
    pub fn from_update(old: Option<&VoiceState>, new: &VoiceState) -> Option<Self> {
        let guild_id = new.guild_id?;

        let (username, nickname) = match &new.member {
            Some(member) => (member.user.name.clone(), member.nick.clone()),
            None => (String::new(), None),
        };

        Some(PresenceEvent {
            guild_id,
            user_id: new.user_id,
            username,
            nickname,
            old_channel: old.and_then(|state| state.channel_id),
            new_channel: new.channel_id,
        })
    }

    fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nick) if !nick.is_empty() => nick,
            _ => &self.username,
        }
    }
}

/// Result of one sweep pass over a tracked room.
#[derive(Debug)]
pub enum SweepOutcome {
    /// Still has members, left alone.
    Occupied(ChannelId, i64),
    /// Remote channel and local records removed.
    Deleted(ChannelId),
    /// Cleanup aborted for this channel; later channels are still swept.
    Failed(ChannelId, Error),
}

/// Apply one presence event to the stores and the platform.
///
/// Partial failures are logged and never escalate; the stores self-heal
/// on the next event that touches the same rows.
pub async fn reconcile(data: &Data, gateway: &impl Gateway, event: &PresenceEvent) {
    // Duplicate or no-change delivery (mute/deafen toggles ride the same
    // event type); nothing moved.
    if event.old_channel == event.new_channel {
        debug!(member = %event.user_id, "presence unchanged, skipping");
        return;
    }

    if event.old_channel.is_some() {
        // Best effort. A stale row misreports occupancy until the next
        // event for this member overwrites it.
        if let Err(error) = data.members().remove(event.guild_id, event.user_id).await {
            warn!(%error, member = %event.user_id, "unable to clear previous occupancy");
        }
    }

    if let Some(channel_id) = event.new_channel {
        if let Err(error) = data
            .members()
            .set(event.guild_id, event.user_id, channel_id)
            .await
        {
            warn!(%error, member = %event.user_id, channel = %channel_id, "unable to record occupancy");
        }
    }

    for outcome in sweep_empty_rooms(data, gateway).await {
        match outcome {
            SweepOutcome::Occupied(channel_id, members) => {
                debug!(channel = %channel_id, members, "room still occupied");
            }
            SweepOutcome::Deleted(channel_id) => {
                info!(channel = %channel_id, "room was empty, deleted");
            }
            SweepOutcome::Failed(channel_id, error) => {
                warn!(channel = %channel_id, %error, "room cleanup aborted");
            }
        }
    }

    if let Some(channel_id) = event.new_channel {
        spawn_rooms(data, gateway, event, channel_id).await;
    }
}

/// Delete every tracked room whose recorded occupancy dropped to zero.
///
/// A failure aborts cleanup for that channel only; in particular a failed
/// remote delete keeps the local record so a later sweep retries it.
async fn sweep_empty_rooms(data: &Data, gateway: &impl Gateway) -> Vec<SweepOutcome> {
    let channels = match data.channels().all().await {
        Ok(channels) => channels,
        Err(error) => {
            warn!(%error, "unable to list rooms for sweep");
            return Vec::new();
        }
    };

    let mut outcomes = Vec::with_capacity(channels.len());
    for channel in channels {
        outcomes.push(sweep_room(data, gateway, channel.id).await);
    }

    outcomes
}

async fn sweep_room(data: &Data, gateway: &impl Gateway, channel_id: ChannelId) -> SweepOutcome {
    let occupancy = match data.members().count(channel_id).await {
        Ok(count) => count,
        Err(error) => return SweepOutcome::Failed(channel_id, error.into()),
    };

    if occupancy > 0 {
        return SweepOutcome::Occupied(channel_id, occupancy);
    }

    if let Err(error) = gateway.delete_channel(channel_id).await {
        return SweepOutcome::Failed(channel_id, error);
    }

    if let Err(error) = data.channels().delete(channel_id).await {
        return SweepOutcome::Failed(channel_id, error.into());
    }

    // Rows should already be gone; clears any the departure bookkeeping
    // missed.
    if let Err(error) = data.members().remove_channel(channel_id).await {
        return SweepOutcome::Failed(channel_id, error.into());
    }

    SweepOutcome::Deleted(channel_id)
}

/// Spawn a room for every lobby matching the joined channel.
///
/// Matching does not assume uniqueness; zero matches is the common case
/// and a failure for one lobby never blocks the rest.
async fn spawn_rooms(data: &Data, gateway: &impl Gateway, event: &PresenceEvent, joined: ChannelId) {
    let lobbies = match data.lobbies().all(event.guild_id).await {
        Ok(lobbies) => lobbies,
        Err(error) => {
            warn!(%error, guild = %event.guild_id, "unable to list lobbies");
            return;
        }
    };

    for lobby in lobbies.iter().filter(|lobby| lobby.id == joined) {
        let name = lobby.channel_name(event.display_name());
        info!(lobby = %lobby.id, member = %event.user_id, room = %name, "member joined a lobby, creating a room");

        let created = match gateway
            .create_voice_channel(event.guild_id, &name, lobby.category_id, lobby.user_limit())
            .await
        {
            Ok(channel_id) => channel_id,
            Err(error) => {
                warn!(%error, lobby = %lobby.id, "unable to create a room");
                continue;
            }
        };

        // Failing here leaks the remote channel until someone removes it
        // by hand; the sweep only considers tracked rooms.
        let record = EphemeralChannel {
            id: created,
            parent_id: lobby.id,
        };
        if let Err(error) = data.channels().insert(&record).await {
            warn!(%error, channel = %created, "unable to persist the room");
        }

        if let Err(error) = gateway
            .move_member(event.guild_id, event.user_id, created)
            .await
        {
            warn!(%error, member = %event.user_id, channel = %created, "unable to move the member into the room");
        }
    }
}
