use poise::CreateReply;
use poise::serenity_prelude::{Colour, CreateEmbed};

use crate::{Context, Error};

// Discord color palette.
const GREEN: u32 = 5_763_719;
const YELLOW: u32 = 16_705_372;
const RED: u32 = 15_548_997;

/// Tagged outcome of a command, shown to the caller as an ephemeral embed.
#[derive(Debug)]
pub struct CommandResponse {
    pub kind: ResponseKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The command did what was asked.
    Success,
    /// A user mistake worth pointing out; nothing broke.
    Warning,
    /// Internal failure. Details go to the log, not the user.
    Failure,
}

impl CommandResponse {
    pub fn success(description: impl Into<String>) -> Self {
        CommandResponse {
            kind: ResponseKind::Success,
            description: description.into(),
        }
    }

    pub fn warning(description: impl Into<String>) -> Self {
        CommandResponse {
            kind: ResponseKind::Warning,
            description: description.into(),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        CommandResponse {
            kind: ResponseKind::Failure,
            description: description.into(),
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ResponseKind::Success => "✅ OK",
            ResponseKind::Warning => "🧀 Warning",
            ResponseKind::Failure => "🚨 Error",
        }
    }

    fn colour(&self) -> Colour {
        match self.kind {
            ResponseKind::Success => Colour::new(GREEN),
            ResponseKind::Warning => Colour::new(YELLOW),
            ResponseKind::Failure => Colour::new(RED),
        }
    }

    fn embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(self.title())
            .description(self.description.clone())
            .colour(self.colour())
    }

    pub async fn send(self, ctx: Context<'_>) -> Result<(), Error> {
        ctx.send(CreateReply::default().embed(self.embed()).ephemeral(true))
            .await?;

        Ok(())
    }
}
