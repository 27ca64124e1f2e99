//! Core data types for the Laurel leveling bot.
//!
//! This crate holds the pure pieces every other Laurel crate builds on: the
//! level formula, the progress view derived from it, the persisted record
//! shapes and the events exchanged with a chat front-end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod formula;
mod models;
mod progress;
mod settings;

pub use events::{MemberJoined, MemberLeft, MessageReceived, Notification};
pub use formula::{XP_PER_LEVEL_UNIT, experience_required_for, level_for};
pub use models::{ExperienceGain, LevelReward, UserLevel};
pub use progress::LevelProgress;
pub use settings::{
    DEFAULT_XP_COOLDOWN, DEFAULT_XP_PER_MESSAGE, GuildSettings, SettingField, SettingsUpdate,
};
