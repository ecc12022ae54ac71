pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;

use sqlx::SqlitePool;

use crate::store::{ChannelStore, LobbyStore, MemberStore};

/// Shared bot state. All durable state lives in the database; handlers
/// re-read it through the store views on every event.
pub struct Data {
    pub db: SqlitePool,
}

impl Data {
    #[must_use]
    pub fn new(pool: &SqlitePool) -> Self {
        Data { db: pool.clone() }
    }

    #[must_use]
    pub fn lobbies(&self) -> LobbyStore {
        LobbyStore::new(&self.db)
    }

    #[must_use]
    pub fn channels(&self) -> ChannelStore {
        ChannelStore::new(&self.db)
    }

    #[must_use]
    pub fn members(&self) -> MemberStore {
        MemberStore::new(&self.db)
    }
}
