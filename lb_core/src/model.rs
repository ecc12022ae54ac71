use poise::serenity_prelude::{ChannelId, GuildId};

/// Prefix for spawned rooms when a lobby has no template of its own.
pub const DEFAULT_TEMPLATE: &str = "Кімната";

/// A voice channel registered to spawn personal rooms for its joiners.
///
/// `template` and `capacity` are three-way options: `None` leaves the
/// stored value untouched on upsert, `Some("")` / `Some(0)` store the
/// "back to default" value, anything else is used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lobby {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub category_id: ChannelId,
    pub template: Option<String>,
    pub capacity: Option<u32>,
}

impl Lobby {
    /// Name for a spawned room: the stored template when present and
    /// non-empty, the default localized prefix otherwise.
    #[must_use]
    pub fn channel_name(&self, display_name: &str) -> String {
        match self.template.as_deref() {
            Some(template) if !template.is_empty() => format!("{template} {display_name}"),
            _ => format!("{DEFAULT_TEMPLATE} {display_name}"),
        }
    }

    /// User limit for a spawned room. 0 is the platform's no-limit
    /// sentinel, so unset and 0 both mean unlimited.
    #[must_use]
    pub fn user_limit(&self) -> u32 {
        self.capacity.unwrap_or(0)
    }
}

/// A bot-created voice room, tracked so it can be torn down once empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralChannel {
    pub id: ChannelId,
    pub parent_id: ChannelId,
}
