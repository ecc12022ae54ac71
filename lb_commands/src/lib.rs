#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
// Capacities are range-checked before they go through i64 -> u32.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

mod common;
mod lobby;
mod message;
mod reset;
mod respond;

pub(crate) use lb_core::structs::{Command, Context, Error};
pub(crate) use respond::CommandResponse;

#[must_use]
pub fn commands() -> Vec<Command> {
    lobby::commands()
        .into_iter()
        .chain(reset::commands())
        .chain(message::commands())
        .collect()
}
