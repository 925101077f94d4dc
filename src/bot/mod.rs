//! Telegram command layer: a pure dialogue state machine plus the teloxide
//! dispatcher that drives it.

pub mod conversation;
mod handler;

pub use handler::{bot_commands, run, BotState};
